use crate::ids::RequestId;
use std::collections::HashMap;

const DEFAULT_CONTROLLER_KEY: &str = "controller";
const DEFAULT_ACTION_KEY: &str = "action";
const DEFAULT_NAME: &str = "index";

/// Request parameters plus the lookup keys and defaults used to read the
/// controller and action identifiers from them.
#[derive(Debug, Clone)]
pub struct Request {
    params: HashMap<String, String>,
    controller_key: String,
    action_key: String,
    default_controller: String,
    default_action: String,
    request_id: Option<RequestId>,
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    #[must_use]
    pub fn new() -> Self {
        Request {
            params: HashMap::new(),
            controller_key: DEFAULT_CONTROLLER_KEY.to_string(),
            action_key: DEFAULT_ACTION_KEY.to_string(),
            default_controller: DEFAULT_NAME.to_string(),
            default_action: DEFAULT_NAME.to_string(),
            request_id: None,
        }
    }

    /// Parse an `application/x-www-form-urlencoded` query string.
    ///
    /// Duplicate keys use "last write wins" semantics.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut req = Self::new();
        for (k, v) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            req.params.insert(k.into_owned(), v.into_owned());
        }
        req
    }

    /// Build from a request URI, reading its query string.
    #[must_use]
    pub fn from_uri(uri: &http::Uri) -> Self {
        Self::from_query(uri.query().unwrap_or(""))
    }

    /// Correlation id supplied by the host; dispatch mints one when absent.
    #[must_use]
    pub fn with_request_id(mut self, id: RequestId) -> Self {
        self.request_id = Some(id);
        self
    }

    #[must_use]
    pub fn request_id(&self) -> Option<RequestId> {
        self.request_id
    }

    #[must_use]
    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// All parameters, sorted by key.
    #[must_use]
    pub fn params(&self) -> Vec<(&str, &str)> {
        let mut params: Vec<_> = self
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        params.sort_unstable();
        params
    }

    /// Controller identifier: the parameter under the controller key, else the
    /// default name, with its first letter upper-cased (class naming).
    #[must_use]
    pub fn controller(&self) -> String {
        let raw = self
            .param(&self.controller_key)
            .filter(|v| !v.is_empty())
            .unwrap_or(&self.default_controller);
        ucfirst(raw)
    }

    /// Action identifier: the parameter under the action key, else the default name.
    #[must_use]
    pub fn action(&self) -> String {
        self.param(&self.action_key)
            .filter(|v| !v.is_empty())
            .unwrap_or(&self.default_action)
            .to_string()
    }

    /// Key identifying the page this request renders: `Controller/action`
    /// followed by the remaining parameters in key order.
    #[must_use]
    pub fn cache_key(&self) -> String {
        let mut key = format!("{}/{}", self.controller(), self.action());
        let mut rest = url::form_urlencoded::Serializer::new(String::new());
        let mut any = false;
        for (k, v) in self.params() {
            if k != self.controller_key && k != self.action_key {
                rest.append_pair(k, v);
                any = true;
            }
        }
        if any {
            key.push('?');
            key.push_str(&rest.finish());
        }
        key
    }

    #[must_use]
    pub fn controller_key(&self) -> &str {
        &self.controller_key
    }

    #[must_use]
    pub fn action_key(&self) -> &str {
        &self.action_key
    }

    pub fn set_default_controller_name(&mut self, name: &str) -> &mut Self {
        self.default_controller = name.to_string();
        self
    }

    pub fn set_default_action_name(&mut self, name: &str) -> &mut Self {
        self.default_action = name.to_string();
        self
    }

    pub fn set_controller_key(&mut self, key: &str) -> &mut Self {
        self.controller_key = key.to_string();
        self
    }

    pub fn set_action_key(&mut self, key: &str) -> &mut Self {
        self.action_key = key.to_string();
        self
    }
}

fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = Request::new();
        assert_eq!(req.controller(), "Index");
        assert_eq!(req.action(), "index");
        assert_eq!(req.controller_key(), "controller");
    }

    #[test]
    fn test_from_query_reads_identifiers() {
        let req = Request::from_query("?controller=home&action=show&id=4");
        assert_eq!(req.controller(), "Home");
        assert_eq!(req.action(), "show");
        assert_eq!(req.param("id"), Some("4"));
    }

    #[test]
    fn test_custom_keys_and_defaults() {
        let mut req = Request::from_query("c=blog&a=list");
        req.set_controller_key("c").set_action_key("a");
        assert_eq!(req.controller(), "Blog");
        assert_eq!(req.action(), "list");

        let mut empty = Request::new();
        empty
            .set_default_controller_name("welcome")
            .set_default_action_name("start");
        assert_eq!(empty.controller(), "Welcome");
        assert_eq!(empty.action(), "start");
    }

    #[test]
    fn test_cache_key_ignores_identifier_params() {
        let req = Request::from_query("controller=home&page=2&action=list&q=a b");
        assert_eq!(req.cache_key(), "Home/list?page=2&q=a+b");
        assert_eq!(Request::new().cache_key(), "Index/index");
    }

    #[test]
    fn test_from_uri() {
        let uri: http::Uri = "/index.cgi?controller=news".parse().unwrap();
        assert_eq!(Request::from_uri(&uri).controller(), "News");
    }
}
