use crate::config::ConfigTree;
use crate::error::Result;
use serde_json::Value;
use tracing::debug;

/// Typed setter invoked with the raw configuration value of its key.
pub type Setter<T> = fn(&mut T, &Value) -> Result<()>;

/// Types that can be configured from a [`ConfigTree`].
pub trait Configurable: Sized + 'static {
    /// Configuration keys and their setters, in application order.
    const SETTERS: &'static [(&'static str, Setter<Self>)];
}

/// Apply `options` onto `target`. Returns how many setters ran.
///
/// # Errors
///
/// Returns the first error raised by a setter.
pub fn bind_options<T: Configurable>(target: &mut T, options: &ConfigTree) -> Result<usize> {
    let table = T::SETTERS;
    let mut applied = 0;

    for (key, setter) in table {
        if let Some(value) = options.get(*key) {
            debug!(
                target_type = std::any::type_name::<T>(),
                key = *key,
                "Applying configuration option"
            );
            setter(target, value)?;
            applied += 1;
        }
    }

    for key in options.keys() {
        if !table.iter().any(|(known, _)| known == key) {
            debug!(
                target_type = std::any::type_name::<T>(),
                key = %key,
                "Ignoring unrecognized configuration option"
            );
        }
    }

    Ok(applied)
}
