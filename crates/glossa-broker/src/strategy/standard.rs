// crates/glossa-broker/src/strategy/standard.rs
// ============================================================================
// Module: Glossa Standard Placeholder Strategy
// Description: Weighted, type-keyed placeholder resolution.
// Purpose: Resolve every bound argument into finalized placeholder values.
// Dependencies: glossa-config, glossa-core
// ============================================================================

//! ## Overview
//! [`StandardStrategy`] keeps resolvers per argument [`TypeId`], ordered by
//! descending weight and then registration order. For each placeholder the
//! first resolver that does not defer wins; continuances are resolved again
//! under their entry name until they conclude.
//! Invariants:
//! - A continuance chain never exceeds `max_depth` steps.
//! - Key collisions follow the configured [`CollisionPolicy`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use glossa_config::CollisionPolicy;
use glossa_config::DEFAULT_MAX_DEPTH;
use glossa_config::PlaceholderConfig;
use glossa_core::Argument;
use glossa_core::Arguments;
use glossa_core::DispatchContext;
use glossa_core::MessageBinding;
use glossa_core::PlaceholderError;
use glossa_core::PlaceholderStrategy;
use glossa_core::ResolvedPlaceholders;

use crate::strategy::PlaceholderResolver;
use crate::strategy::Resolution;
use crate::strategy::Resolutions;

// ============================================================================
// SECTION: Registrations
// ============================================================================

/// One registered resolver.
struct Registration<R, F> {
    /// Priority; higher runs first.
    weight: i32,
    /// Resolver implementation.
    resolver: Arc<dyn PlaceholderResolver<R, F>>,
}

impl<R, F> Clone for Registration<R, F> {
    fn clone(&self) -> Self {
        Self {
            weight: self.weight,
            resolver: Arc::clone(&self.resolver),
        }
    }
}

/// Resolver built from a closure over a concrete argument type.
struct TypedResolver<T, C> {
    /// Resolution closure.
    resolve: C,
    /// Argument type marker.
    value: PhantomData<fn(&T)>,
}

impl<R, F, T, C> PlaceholderResolver<R, F> for TypedResolver<T, C>
where
    T: Any,
    C: Fn(&T, &R, &str) -> Result<Option<Resolutions<F>>, PlaceholderError> + Send + Sync,
{
    fn resolve(
        &self,
        _ctx: &DispatchContext<'_>,
        receiver: &R,
        name: &str,
        value: &Argument,
    ) -> Result<Option<Resolutions<F>>, PlaceholderError> {
        match value.downcast_ref::<T>() {
            Some(value) => (self.resolve)(value, receiver, name),
            None => Ok(None),
        }
    }
}

// ============================================================================
// SECTION: Standard Strategy
// ============================================================================

/// Weighted placeholder strategy.
///
/// # Type Parameters
/// - `R`: receiver type.
/// - `F`: finalized placeholder type.
pub struct StandardStrategy<R, F> {
    /// Resolvers by argument type, in evaluation order.
    resolvers: HashMap<TypeId, Vec<Registration<R, F>>>,
    /// Collision policy.
    collision: CollisionPolicy,
    /// Maximum continuance chain length.
    max_depth: usize,
}

impl<R, F> Default for StandardStrategy<R, F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, F> Clone for StandardStrategy<R, F> {
    fn clone(&self) -> Self {
        Self {
            resolvers: self.resolvers.clone(),
            collision: self.collision,
            max_depth: self.max_depth,
        }
    }
}

impl<R, F> fmt::Debug for StandardStrategy<R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardStrategy")
            .field("types", &self.resolvers.len())
            .field("collision", &self.collision)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl<R, F> StandardStrategy<R, F> {
    /// Creates an empty strategy with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolvers: HashMap::new(),
            collision: CollisionPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Creates an empty strategy using configured limits.
    #[must_use]
    pub fn from_config(config: &PlaceholderConfig) -> Self {
        Self::new().with_collision(config.collision).with_max_depth(config.max_depth)
    }

    /// Sets the collision policy.
    #[must_use]
    pub const fn with_collision(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    /// Sets the maximum continuance chain length.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the collision policy.
    #[must_use]
    pub const fn collision(&self) -> CollisionPolicy {
        self.collision
    }

    /// Returns the maximum continuance chain length.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the number of resolvers registered for `T`.
    #[must_use]
    pub fn resolver_count<T: Any>(&self) -> usize {
        self.resolvers.get(&TypeId::of::<T>()).map_or(0, Vec::len)
    }

    /// Registers `resolver` for arguments of type `T`.
    #[must_use]
    pub fn register<T: Any>(
        mut self,
        weight: i32,
        resolver: impl PlaceholderResolver<R, F> + 'static,
    ) -> Self {
        let registrations = self.resolvers.entry(TypeId::of::<T>()).or_default();
        registrations.push(Registration {
            weight,
            resolver: Arc::new(resolver),
        });
        registrations.sort_by(|a, b| b.weight.cmp(&a.weight));
        self
    }

    /// Registers a closure resolver for arguments of type `T`.
    #[must_use]
    pub fn register_fn<T, C>(self, weight: i32, resolve: C) -> Self
    where
        T: Any,
        R: 'static,
        F: 'static,
        C: Fn(&T, &R, &str) -> Result<Option<Resolutions<F>>, PlaceholderError>
            + Send
            + Sync
            + 'static,
    {
        self.register::<T>(weight, TypedResolver {
            resolve,
            value: PhantomData,
        })
    }

    /// Registers a resolver that concludes values of type `T` under the
    /// placeholder's own name.
    #[must_use]
    pub fn conclude<T, C>(self, weight: i32, convert: C) -> Self
    where
        T: Any,
        R: 'static,
        F: 'static,
        C: Fn(&T) -> F + Send + Sync + 'static,
    {
        self.register_fn::<T, _>(weight, move |value: &T, _receiver: &R, name: &str| {
            Ok(Some(vec![(name.to_string(), Resolution::Conclusion(convert(value)))]))
        })
    }

    /// Resolves `value` bound to `name` into `out`.
    fn resolve_value(
        &self,
        ctx: &DispatchContext<'_>,
        receiver: &R,
        name: &str,
        value: &Argument,
        depth: usize,
        out: &mut ResolvedPlaceholders<F>,
    ) -> Result<(), PlaceholderError> {
        let registrations =
            self.resolvers.get(&value.value_type_id()).map_or(&[][..], Vec::as_slice);
        for registration in registrations {
            let Some(entries) = registration.resolver.resolve(ctx, receiver, name, value)? else {
                continue;
            };
            for (key, resolution) in entries {
                match resolution {
                    Resolution::Conclusion(finalized) => self.insert(out, key, finalized)?,
                    Resolution::Continuance(next) => {
                        if depth >= self.max_depth {
                            return Err(PlaceholderError::DepthExceeded {
                                placeholder: key,
                                max_depth: self.max_depth,
                            });
                        }
                        self.resolve_value(ctx, receiver, &key, &next, depth + 1, out)?;
                    }
                }
            }
            return Ok(());
        }
        Err(PlaceholderError::NoResolver {
            placeholder: name.to_string(),
            type_name: value.type_name(),
        })
    }

    /// Inserts one conclusion under the collision policy.
    fn insert(
        &self,
        out: &mut ResolvedPlaceholders<F>,
        key: String,
        value: F,
    ) -> Result<(), PlaceholderError> {
        if self.collision == CollisionPolicy::Reject && out.contains(&key) {
            return Err(PlaceholderError::Collision {
                placeholder: key,
            });
        }
        out.insert(key, value);
        Ok(())
    }
}

impl<R: 'static, F: From<String> + 'static> StandardStrategy<R, F> {
    /// Registers weight-0 resolvers that conclude common scalar types with
    /// their `to_string` form.
    #[must_use]
    pub fn display_fallback(self) -> Self {
        macro_rules! display {
            ($strategy:expr, $($ty:ty),+ $(,)?) => {
                $strategy$(.conclude::<$ty, _>(0, |value: &$ty| F::from(value.to_string())))+
            };
        }
        display!(
            self,
            String,
            &'static str,
            bool,
            char,
            i8,
            i16,
            i32,
            i64,
            i128,
            isize,
            u8,
            u16,
            u32,
            u64,
            u128,
            usize,
            f32,
            f64,
        )
    }
}

impl<R, I, F> PlaceholderStrategy<R, I, F> for StandardStrategy<R, F> {
    fn resolve_placeholders(
        &self,
        ctx: &DispatchContext<'_>,
        receiver: &R,
        _message: &I,
        binding: &MessageBinding<R>,
        args: &Arguments,
    ) -> Result<ResolvedPlaceholders<F>, PlaceholderError> {
        let mut resolved = ResolvedPlaceholders::new();
        for param in binding.placeholders() {
            let value = args.get(param.index).ok_or_else(|| PlaceholderError::MissingArgument {
                placeholder: param.name.clone(),
                index: param.index,
            })?;
            self.resolve_value(ctx, receiver, &param.name, value, 0, &mut resolved)?;
        }
        Ok(resolved)
    }
}
