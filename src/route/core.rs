use crate::error::InvalidBindingError;
use crate::registry::validate_name;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Maximum number of path parameters before heap allocation.
/// Most REST APIs have ≤4 path params (e.g., /users/{id}/posts/{postId}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Ordered `(placeholder, raw value)` pairs for one request.
///
/// Names are `Arc<str>` shared with the route declaration; values are the
/// per-request strings taken from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route '{template}' has an empty placeholder")]
    EmptyPlaceholder { template: String },

    #[error("route '{template}' has an invalid placeholder: {source}")]
    InvalidPlaceholder {
        template: String,
        #[source]
        source: InvalidBindingError,
    },

    #[error("route '{template}' declares placeholder '{name}' more than once")]
    DuplicatePlaceholder { template: String, name: String },
}

/// One segment of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(Arc<str>),
    Placeholder(Arc<str>),
}

/// A parsed route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDeclaration {
    template: Arc<str>,
    segments: Vec<Segment>,
}

impl RouteDeclaration {
    /// Parse a template such as `/users/{user}/posts/{post}`.
    ///
    /// Empty segments (leading, trailing or doubled slashes) are ignored.
    ///
    /// # Errors
    ///
    /// Fails on empty placeholders (`{}`, `:`), placeholder names that could not
    /// be registered as bindings, and placeholders repeated within the template.
    pub fn parse(template: &str) -> Result<Self, RouteError> {
        let mut segments = Vec::with_capacity(template.matches('/').count());

        for segment in template.split('/').filter(|s| !s.is_empty()) {
            let placeholder = segment
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
                .or_else(|| segment.strip_prefix(':'));

            let Some(name) = placeholder else {
                segments.push(Segment::Literal(Arc::from(segment)));
                continue;
            };

            match validate_name(name) {
                Ok(()) => {}
                Err(InvalidBindingError::EmptyName) => {
                    return Err(RouteError::EmptyPlaceholder {
                        template: template.to_string(),
                    })
                }
                Err(source) => {
                    return Err(RouteError::InvalidPlaceholder {
                        template: template.to_string(),
                        source,
                    })
                }
            }

            let repeated = segments
                .iter()
                .any(|s| matches!(s, Segment::Placeholder(existing) if existing.as_ref() == name));
            if repeated {
                return Err(RouteError::DuplicatePlaceholder {
                    template: template.to_string(),
                    name: name.to_string(),
                });
            }
            segments.push(Segment::Placeholder(Arc::from(name)));
        }

        Ok(Self {
            template: Arc::from(template),
            segments,
        })
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder names in path order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_ref()),
            Segment::Literal(_) => None,
        })
    }

    /// Extract raw placeholder values from a concrete request path.
    ///
    /// Returns `None` when the path does not fit the template: a different
    /// segment count, a literal mismatch, or an empty value for a placeholder.
    /// Any query string is ignored.
    #[must_use]
    pub fn capture(&self, path: &str) -> Option<ParamVec> {
        let path = path.split_once('?').map_or(path, |(p, _)| p);
        let mut parts = path.split('/').filter(|s| !s.is_empty());
        let mut params = ParamVec::new();

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(lit) if lit.as_ref() == part => {}
                Segment::Literal(_) => return None,
                Segment::Placeholder(name) => params.push((Arc::clone(name), part.to_string())),
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }
}

impl fmt::Display for RouteDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}
