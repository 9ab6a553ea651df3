use crate::error::{InvalidBindingError, NotFoundError};
use crate::resolver::Resolver;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

/// Characters that would break placeholder syntax in a route template.
const RESERVED_CHARS: [char; 4] = ['/', '{', '}', ':'];

/// A registered placeholder name and its resolver. Immutable once created.
#[derive(Clone)]
pub struct Binding {
    name: Arc<str>,
    resolver: Arc<dyn Resolver>,
    /// Registration position, used to index per-binding state.
    index: usize,
}

impl Binding {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the name; cheap to store in per-request maps.
    #[inline]
    #[must_use]
    pub fn name_arc(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    #[inline]
    #[must_use]
    pub fn resolver(&self) -> &Arc<dyn Resolver> {
        &self.resolver
    }

    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("name", &self.name)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// Check that `name` can be used as a placeholder.
///
/// # Errors
///
/// [`InvalidBindingError::EmptyName`] for empty or whitespace-only names and
/// [`InvalidBindingError::InvalidName`] for names containing whitespace or
/// route syntax characters.
pub fn validate_name(name: &str) -> Result<(), InvalidBindingError> {
    if name.trim().is_empty() {
        return Err(InvalidBindingError::EmptyName);
    }
    if name
        .chars()
        .any(|c| c.is_whitespace() || RESERVED_CHARS.contains(&c))
    {
        return Err(InvalidBindingError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Ordered table of bindings keyed by name.
///
/// Registration order is kept for enumeration only; per-request resolution
/// order comes from the route's placeholder order.
#[derive(Default, Clone)]
pub struct BindingRegistry {
    bindings: Vec<Binding>,
    by_name: HashMap<Arc<str>, usize>,
}

impl BindingRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `resolver` under `name`.
    ///
    /// # Errors
    ///
    /// Fails if the name is invalid or already taken. A rejected registration
    /// leaves the table unchanged.
    pub fn register<R: Resolver>(
        &mut self,
        name: &str,
        resolver: R,
    ) -> Result<(), InvalidBindingError> {
        self.insert(name, Arc::new(resolver))
    }

    /// Register a resolver that may be absent, e.g. one looked up from a plugin
    /// table at startup.
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register), plus
    /// [`InvalidBindingError::MissingResolver`] when `resolver` is `None`.
    pub fn register_dyn(
        &mut self,
        name: &str,
        resolver: Option<Arc<dyn Resolver>>,
    ) -> Result<(), InvalidBindingError> {
        match resolver {
            Some(resolver) => self.insert(name, resolver),
            None => {
                validate_name(name)?;
                error!(binding = %name, "Binding rejected - no resolver supplied");
                Err(InvalidBindingError::MissingResolver {
                    name: name.to_string(),
                })
            }
        }
    }

    fn insert(&mut self, name: &str, resolver: Arc<dyn Resolver>) -> Result<(), InvalidBindingError> {
        if let Err(e) = validate_name(name) {
            error!(binding = %name, error = %e, "Binding rejected - invalid name");
            return Err(e);
        }
        if self.by_name.contains_key(name) {
            error!(
                binding = %name,
                total_bindings = self.bindings.len(),
                "Binding rejected - name already registered"
            );
            return Err(InvalidBindingError::Duplicate {
                name: name.to_string(),
            });
        }

        let name: Arc<str> = Arc::from(name);
        let index = self.bindings.len();
        self.by_name.insert(Arc::clone(&name), index);
        self.bindings.push(Binding {
            name: Arc::clone(&name),
            resolver,
            index,
        });

        info!(
            binding = %name,
            total_bindings = self.bindings.len(),
            "Binding registered successfully"
        );
        Ok(())
    }

    /// Look up the binding for a placeholder.
    ///
    /// # Errors
    ///
    /// [`NotFoundError`] when no binding has that name, which means a route
    /// references a placeholder nobody registered.
    pub fn lookup(&self, name: &str) -> Result<&Binding, NotFoundError> {
        self.by_name
            .get(name)
            .map(|&idx| &self.bindings[idx])
            .ok_or_else(|| NotFoundError::new(name))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Binding names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.bindings.iter().map(Binding::name)
    }

    /// Bindings in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> + '_ {
        self.bindings.iter()
    }
}

impl fmt::Debug for BindingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
