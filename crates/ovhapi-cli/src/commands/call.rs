//! One call described by flags
//!
//! Credentials come from `OVH_*` variables or `ovh.conf`, never from flags.

use clap::Args;
use serde_json::{Map, Value};

#[derive(Debug, Args)]
pub struct CallArgs {
    /// Remote resource path, e.g. /me
    #[arg(long)]
    pub path: String,

    /// GET, PUT, POST or DELETE
    #[arg(long, default_value = "GET")]
    pub method: String,

    /// Call parameters as a JSON mapping
    #[arg(long)]
    pub body: Option<String>,

    /// Endpoint name (ovh-eu, ovh-ca, ...) or base URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Report every mutation as a change without comparing snapshots
    #[arg(long)]
    pub no_detect_changes: bool,

    /// Compare every sequence without regard to order
    #[arg(long)]
    pub unordered_lists: bool,

    /// JSON pointer of a sequence to compare without regard to order
    #[arg(long = "unordered-field")]
    pub unordered_fields: Vec<String>,

    /// Include before/after snapshots in the result
    #[arg(long)]
    pub diff: bool,
}

pub fn execute(args: CallArgs) -> Result<(), Box<dyn std::error::Error>> {
    super::run_and_print(&module_args(args), "cli:call")
}

/// Module parameters equivalent to the flags
fn module_args(args: CallArgs) -> Value {
    let mut map = Map::new();
    map.insert("path".to_string(), Value::String(args.path));
    map.insert("method".to_string(), Value::String(args.method));
    if let Some(body) = args.body {
        map.insert("body".to_string(), Value::String(body));
    }
    if let Some(endpoint) = args.endpoint {
        map.insert("endpoint".to_string(), Value::String(endpoint));
    }
    map.insert("detect_changes".to_string(), Value::Bool(!args.no_detect_changes));
    map.insert("unordered_lists".to_string(), Value::Bool(args.unordered_lists));
    map.insert(
        "unordered_fields".to_string(),
        Value::Array(args.unordered_fields.into_iter().map(Value::String).collect()),
    );
    map.insert("_ansible_diff".to_string(), Value::Bool(args.diff));
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flags_become_module_parameters() {
        let args = CallArgs {
            path: "/ip/1.2.3.4/reverse".to_string(),
            method: "post".to_string(),
            body: Some("{\"ipReverse\": \"1.2.3.4\"}".to_string()),
            endpoint: Some("ovh-eu".to_string()),
            no_detect_changes: false,
            unordered_lists: false,
            unordered_fields: vec!["/ips".to_string()],
            diff: true,
        };
        assert_eq!(
            module_args(args),
            json!({
                "path": "/ip/1.2.3.4/reverse",
                "method": "post",
                "body": "{\"ipReverse\": \"1.2.3.4\"}",
                "endpoint": "ovh-eu",
                "detect_changes": true,
                "unordered_lists": false,
                "unordered_fields": ["/ips"],
                "_ansible_diff": true
            })
        );
    }
}
