use crate::ids::RequestId;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::sync::Arc;
use thiserror::Error;

/// Resolved values stored inline before spilling to the heap.
/// Most routes carry no more than a handful of placeholders.
pub const MAX_INLINE_VALUES: usize = 8;

type ValueVec = SmallVec<[(Arc<str>, Value); MAX_INLINE_VALUES]>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("parameter '{name}' is already resolved for this request")]
    AlreadySet { name: String },

    #[error("parameter '{name}' is not resolved for this request")]
    Missing { name: String },

    #[error("parameter '{name}' does not deserialize into the requested type: {message}")]
    Deserialize { name: String, message: String },
}

/// Per-request store of resolved placeholder values.
///
/// Iteration yields values in the order they were resolved, which matches the
/// route's placeholder order.
#[derive(Debug)]
pub struct RequestContext {
    request_id: RequestId,
    values: ValueVec,
}

impl RequestContext {
    #[must_use]
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            values: ValueVec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Store a resolved value.
    ///
    /// # Errors
    ///
    /// [`ContextError::AlreadySet`] if `name` already has a value; the existing
    /// value is kept.
    pub fn insert(&mut self, name: Arc<str>, value: Value) -> Result<(), ContextError> {
        if self.contains(&name) {
            return Err(ContextError::AlreadySet {
                name: name.to_string(),
            });
        }
        self.values.push((name, value));
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v)
    }

    /// Deserialize a resolved value into a handler's own type.
    ///
    /// # Errors
    ///
    /// [`ContextError::Missing`] if the name was never resolved and
    /// [`ContextError::Deserialize`] if the value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, ContextError> {
        let value = self.get(name).ok_or_else(|| ContextError::Missing {
            name: name.to_string(),
        })?;
        T::deserialize(value).map_err(|e| ContextError::Deserialize {
            name: name.to_string(),
            message: e.to_string(),
        })
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.iter().any(|(k, _)| k.as_ref() == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Names and values in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_ref(), v))
    }

    /// Render as a JSON object, e.g. for handlers that forward the context.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Value::Object(map)
    }

    /// Read-only copy of the values resolved so far.
    ///
    /// The dispatcher attaches this to the [`RequestInfo`] it hands to later
    /// resolvers, so a child resource can be looked up within its parent.
    ///
    /// [`RequestInfo`]: crate::request::RequestInfo
    #[must_use]
    pub fn snapshot(&self) -> ResolvedParams {
        ResolvedParams {
            values: self.values.iter().cloned().collect(),
        }
    }

    /// Consume into a name → value map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.values
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}

/// Values resolved earlier in the same request, as seen by a later resolver.
///
/// Read it from [`RequestInfo::resolved_params`](crate::request::RequestInfo::resolved_params).
#[derive(Debug, Clone)]
pub struct ResolvedParams {
    values: Arc<[(Arc<str>, Value)]>,
}

impl ResolvedParams {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v)
    }

    /// # Errors
    ///
    /// Same as [`RequestContext::get_as`].
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, ContextError> {
        let value = self.get(name).ok_or_else(|| ContextError::Missing {
            name: name.to_string(),
        })?;
        T::deserialize(value).map_err(|e| ContextError::Deserialize {
            name: name.to_string(),
            message: e.to_string(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn ctx() -> RequestContext {
        RequestContext::new(RequestId::new())
    }

    #[test]
    fn test_insert_is_additive_only() {
        let mut ctx = ctx();
        ctx.insert(Arc::from("user"), json!({ "id": 1 })).unwrap();
        let err = ctx.insert(Arc::from("user"), json!({ "id": 2 })).unwrap_err();

        assert_eq!(err, ContextError::AlreadySet { name: "user".into() });
        assert_eq!(ctx.get("user"), Some(&json!({ "id": 1 })));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_iteration_follows_insert_order() {
        let mut ctx = ctx();
        ctx.insert(Arc::from("org"), json!(1)).unwrap();
        ctx.insert(Arc::from("team"), json!(2)).unwrap();
        ctx.insert(Arc::from("member"), json!(3)).unwrap();

        let names: Vec<&str> = ctx.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["org", "team", "member"]);
    }

    #[test]
    fn test_get_as_typed() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct User {
            id: u32,
            name: String,
        }

        let mut ctx = ctx();
        ctx.insert(Arc::from("user"), json!({ "id": 1, "name": "Mirko" }))
            .unwrap();

        let user: User = ctx.get_as("user").unwrap();
        assert_eq!(
            user,
            User {
                id: 1,
                name: "Mirko".into()
            }
        );
        assert!(matches!(
            ctx.get_as::<User>("post"),
            Err(ContextError::Missing { .. })
        ));
        assert!(matches!(
            ctx.get_as::<u64>("user"),
            Err(ContextError::Deserialize { .. })
        ));
    }

    #[test]
    fn test_snapshot_is_detached_from_later_writes() {
        let mut ctx = ctx();
        ctx.insert(Arc::from("user"), json!({ "id": 1 })).unwrap();
        let snap = ctx.snapshot();
        ctx.insert(Arc::from("post"), json!({ "id": 9 })).unwrap();

        assert_eq!(snap.len(), 1);
        assert_eq!(snap.get("user"), Some(&json!({ "id": 1 })));
        assert!(snap.get("post").is_none());
    }

    #[test]
    fn test_to_json_and_into_map() {
        let mut ctx = ctx();
        assert!(ctx.is_empty());
        ctx.insert(Arc::from("user"), json!({ "id": 1 })).unwrap();
        ctx.insert(Arc::from("post"), json!({ "id": 9 })).unwrap();

        assert_eq!(
            ctx.to_json(),
            json!({ "user": { "id": 1 }, "post": { "id": 9 } })
        );
        let map = ctx.into_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map["post"], json!({ "id": 9 }));
    }
}
