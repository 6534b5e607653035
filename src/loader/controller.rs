use super::registry::ClassRegistry;
use super::resolver::PathResolver;
use crate::error::{KernelError, Result};
use crate::server::Request;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::{debug, warn};

static IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex should be valid")
});

/// Whether `name` can name a class (and therefore a unit file).
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER_REGEX.is_match(name)
}

/// Resolve the request's controller to a defined class name.
///
/// # Errors
///
/// - [`KernelError::NotFound`] when the identifier is not a class name or its unit file does not exist
/// - [`KernelError::Load`] when the unit file exists but cannot be read
/// - [`KernelError::InvalidController`] when the loaded unit does not define the class
pub fn load_controller<F>(
    request: &Request,
    directory: &Path,
    resolver: &dyn PathResolver,
    registry: &mut ClassRegistry<F>,
) -> Result<String> {
    let class_name = request.controller();
    let file_path = resolver.join_path(directory, &class_name);

    debug!(
        class = %class_name,
        path = %file_path.display(),
        "Resolving controller"
    );

    if !is_valid_identifier(&class_name) {
        warn!(class = %class_name, "Rejected controller identifier");
        return Err(KernelError::NotFound { path: file_path });
    }

    if !resolver.exists(&file_path) {
        return Err(KernelError::NotFound { path: file_path });
    }

    if !resolver.is_readable(&file_path) {
        return Err(KernelError::Load {
            class: class_name,
            path: file_path,
        });
    }

    registry.load_unit(&file_path);

    if !registry.is_defined(&class_name) {
        return Err(KernelError::InvalidController {
            class: class_name,
            path: file_path,
        });
    }

    Ok(class_name)
}
