//! Wire contract for the two known backend deployments.
//!
//! The path-based API addresses everything through the URL
//! (`/user/{reg_id}/subscription/{alias}`) while the query-param API
//! passes the registration id as a query or form field. They are not
//! wire compatible so a client picks one at construction time.

use std::fmt;
use std::str::FromStr;

use reqwest::{Method, Url};

use super::error::ClientError;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ApiVariant {
    /// `GET /channel/{channel}`, `PUT /user/{reg_id}/subscription/{alias}`, ...
    #[default]
    #[value(name = "path")]
    PathBased,
    /// `GET /alias?reg_id=..`, `POST /register`, ...
    #[value(name = "query")]
    QueryParam,
}

impl fmt::Display for ApiVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathBased => write!(f, "path"),
            Self::QueryParam => write!(f, "query"),
        }
    }
}

impl FromStr for ApiVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "path" | "a" => Ok(Self::PathBased),
            "query" | "b" => Ok(Self::QueryParam),
            other => anyhow::bail!("Unknown API variant: {}", other),
        }
    }
}

/// A logical call against the backend, independent of how it is encoded.
#[derive(Debug, Clone, Copy)]
pub enum Operation<'a> {
    Register {
        reg_id: &'a str,
    },
    ListAliases {
        reg_id: &'a str,
    },
    AddAlias {
        reg_id: &'a str,
        alias: &'a str,
    },
    DeleteAlias {
        reg_id: &'a str,
        alias: &'a str,
    },
    ListChannel {
        channel: &'a str,
    },
    PostMessage {
        channel: &'a str,
        message: &'a str,
        collapse_key: Option<&'a str>,
        delay_while_idle: bool,
    },
}

impl Operation<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::ListAliases { .. } => "list aliases",
            Self::AddAlias { .. } => "add alias",
            Self::DeleteAlias { .. } => "delete alias",
            Self::ListChannel { .. } => "list channel",
            Self::PostMessage { .. } => "post message",
        }
    }
}

/// A fully resolved HTTP request shape relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: Method,
    pub segments: Vec<String>,
    pub trailing_slash: bool,
    pub query: Vec<(&'static str, String)>,
    pub form: Vec<(&'static str, String)>,
}

impl Route {
    fn new(method: Method, segments: &[&str]) -> Self {
        Self {
            method,
            segments: segments.iter().map(|s| s.to_string()).collect(),
            trailing_slash: false,
            query: Vec::new(),
            form: Vec::new(),
        }
    }

    fn trailing_slash(mut self) -> Self {
        self.trailing_slash = true;
        self
    }

    fn query(mut self, key: &'static str, value: &str) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    fn form(mut self, key: &'static str, value: &str) -> Self {
        self.form.push((key, value.to_string()));
        self
    }

    /// Join the route onto `base`, percent-encoding each path segment.
    ///
    /// Empty, `.` and `..` segments are rejected since URL normalisation
    /// would turn them into a different path.
    pub fn url(&self, base: &Url) -> Result<Url, ClientError> {
        if let Some(bad) = self
            .segments
            .iter()
            .find(|s| matches!(s.as_str(), "" | "." | ".."))
        {
            return Err(ClientError::InvalidSegment { value: bad.clone() });
        }

        let mut url = base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidBaseUrl(base.to_string()))?;
            path.pop_if_empty().extend(&self.segments);
            if self.trailing_slash {
                path.push("");
            }
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }

    /// Unencoded path used in diagnostics, e.g. `/user/abc/subscription/`.
    pub fn path(&self) -> String {
        let slash = if self.trailing_slash { "/" } else { "" };
        format!("/{}{}", self.segments.join("/"), slash)
    }
}

impl ApiVariant {
    /// Resolve `op` to a request, or `None` when this deployment has no
    /// endpoint for it.
    pub fn route(&self, op: &Operation<'_>) -> Option<Route> {
        match self {
            Self::PathBased => Some(path_based(op)),
            Self::QueryParam => query_param(op),
        }
    }
}

fn path_based(op: &Operation<'_>) -> Route {
    match *op {
        Operation::Register { reg_id } => Route::new(Method::PUT, &["user", reg_id]),
        Operation::ListAliases { reg_id } => {
            Route::new(Method::GET, &["user", reg_id, "subscription"]).trailing_slash()
        }
        Operation::AddAlias { reg_id, alias } => {
            Route::new(Method::PUT, &["user", reg_id, "subscription", alias])
        }
        Operation::DeleteAlias { reg_id, alias } => {
            Route::new(Method::DELETE, &["user", reg_id, "subscription", alias])
        }
        Operation::ListChannel { channel } => Route::new(Method::GET, &["channel", channel]),
        Operation::PostMessage {
            channel,
            message,
            collapse_key,
            delay_while_idle,
        } => {
            let route = Route::new(Method::POST, &["channel", channel]).form("message", message);
            with_delivery_fields(route, collapse_key, delay_while_idle)
        }
    }
}

fn query_param(op: &Operation<'_>) -> Option<Route> {
    let route = match *op {
        Operation::Register { reg_id } => {
            Route::new(Method::POST, &["register"]).form("reg_id", reg_id)
        }
        Operation::ListAliases { reg_id } => {
            Route::new(Method::GET, &["alias"]).query("reg_id", reg_id)
        }
        Operation::AddAlias { reg_id, alias } => Route::new(Method::POST, &["alias"])
            .form("reg_id", reg_id)
            .form("alias", alias),
        Operation::PostMessage {
            channel,
            message,
            collapse_key,
            delay_while_idle,
        } => {
            let route = Route::new(Method::POST, &["send"])
                .form("to", channel)
                .form("msg", message);
            with_delivery_fields(route, collapse_key, delay_while_idle)
        }
        Operation::DeleteAlias { .. } | Operation::ListChannel { .. } => return None,
    };
    Some(route)
}

fn with_delivery_fields(route: Route, collapse_key: Option<&str>, delay_while_idle: bool) -> Route {
    let route = match collapse_key {
        Some(key) => route.form("collapse_key", key),
        None => route,
    };
    route.form("delay_while_idle", if delay_while_idle { "1" } else { "0" })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://api.kisspush.net/").unwrap()
    }

    #[test]
    fn it_builds_path_based_alias_urls() {
        let op = Operation::ListAliases { reg_id: "abc" };
        let route = ApiVariant::PathBased.route(&op).unwrap();
        assert_eq!(route.method, Method::GET);
        assert_eq!(
            route.url(&base()).unwrap().as_str(),
            "http://api.kisspush.net/user/abc/subscription/"
        );

        let op = Operation::DeleteAlias {
            reg_id: "abc",
            alias: "me",
        };
        let route = ApiVariant::PathBased.route(&op).unwrap();
        assert_eq!(route.method, Method::DELETE);
        assert_eq!(route.path(), "/user/abc/subscription/me");
    }

    #[test]
    fn it_encodes_path_segments() {
        let op = Operation::AddAlias {
            reg_id: "abc",
            alias: "my alias/x",
        };
        let url = ApiVariant::PathBased
            .route(&op)
            .unwrap()
            .url(&base())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://api.kisspush.net/user/abc/subscription/my%20alias%2Fx"
        );
    }

    #[test]
    fn it_rejects_segments_that_would_change_the_path() {
        for alias in ["", ".", ".."] {
            let op = Operation::DeleteAlias { reg_id: "abc", alias };
            let err = ApiVariant::PathBased
                .route(&op)
                .unwrap()
                .url(&base())
                .unwrap_err();
            assert!(matches!(err, ClientError::InvalidSegment { ref value } if value == alias));
        }

        let op = Operation::ListChannel { channel: ".." };
        let route = ApiVariant::PathBased.route(&op).unwrap();
        assert!(route.url(&base()).is_err());

        let op = Operation::ListAliases { reg_id: "." };
        let route = ApiVariant::PathBased.route(&op).unwrap();
        assert!(route.url(&base()).is_err());
    }

    #[test]
    fn it_allows_dots_inside_segments() {
        let op = Operation::AddAlias {
            reg_id: "abc",
            alias: "...x",
        };
        let url = ApiVariant::PathBased
            .route(&op)
            .unwrap()
            .url(&base())
            .unwrap();
        assert_eq!(url.as_str(), "http://api.kisspush.net/user/abc/subscription/...x");
    }

    #[test]
    fn it_keeps_the_base_path_prefix() {
        let base = Url::parse("http://localhost:8080/api").unwrap();
        let op = Operation::ListChannel { channel: "news" };
        let url = ApiVariant::PathBased.route(&op).unwrap().url(&base).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/channel/news");
    }

    #[test]
    fn it_builds_query_param_routes() {
        let op = Operation::ListAliases { reg_id: "a b" };
        let url = ApiVariant::QueryParam
            .route(&op)
            .unwrap()
            .url(&base())
            .unwrap();
        assert_eq!(url.as_str(), "http://api.kisspush.net/alias?reg_id=a+b");

        let op = Operation::Register { reg_id: "abc" };
        let route = ApiVariant::QueryParam.route(&op).unwrap();
        assert_eq!(route.method, Method::POST);
        assert_eq!(route.form, vec![("reg_id", "abc".to_string())]);
    }

    #[test]
    fn it_has_no_delete_or_channel_listing_with_query_params() {
        let delete = Operation::DeleteAlias {
            reg_id: "abc",
            alias: "me",
        };
        let list = Operation::ListChannel { channel: "news" };
        assert!(ApiVariant::QueryParam.route(&delete).is_none());
        assert!(ApiVariant::QueryParam.route(&list).is_none());
    }

    #[test]
    fn it_adds_delivery_fields_to_posted_messages() {
        let op = Operation::PostMessage {
            channel: "news",
            message: "hello",
            collapse_key: Some("k"),
            delay_while_idle: false,
        };
        let route = ApiVariant::QueryParam.route(&op).unwrap();
        assert_eq!(route.path(), "/send");
        assert_eq!(
            route.form,
            vec![
                ("to", "news".to_string()),
                ("msg", "hello".to_string()),
                ("collapse_key", "k".to_string()),
                ("delay_while_idle", "0".to_string()),
            ]
        );
    }

    #[test]
    fn it_uses_one_name_per_variant() {
        use clap::ValueEnum;

        for variant in ApiVariant::value_variants() {
            let name = variant.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(variant.to_string(), name);
            assert_eq!(name.parse::<ApiVariant>().unwrap(), *variant);
        }
    }

    #[test]
    fn it_parses_variant_names() {
        assert_eq!("path".parse::<ApiVariant>().unwrap(), ApiVariant::PathBased);
        assert_eq!("QUERY".parse::<ApiVariant>().unwrap(), ApiVariant::QueryParam);
        assert!("soap".parse::<ApiVariant>().is_err());
    }
}
