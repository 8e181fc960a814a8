// src/crawl/links.rs
// =============================================================================
// This module finds links inside a Redfish JSON document.
//
// A link is any "@odata.id" field whose value is a string under the service
// root path ("/redfish/v1"). Links can sit at any depth:
//
//   {
//     "@odata.id": "/redfish/v1/Chassis",          <- the document's own id
//     "Members": [
//       { "@odata.id": "/redfish/v1/Chassis/1" }   <- a link
//     ],
//     "Links": { "ManagedBy": [ { "@odata.id": "/redfish/v1/Managers/1" } ] }
//   }
//
// We walk the document with an explicit stack instead of recursion, so a
// deeply nested document cannot overflow the call stack. The walk is lazy:
// extract_links() returns an iterator that does the work as you pull items.
//
// Order is pre-order in the document's natural key/array order.
// =============================================================================

use serde_json::Value;

use crate::resource::{ODATA_ID, SERVICE_ROOT_PATH};

/// A candidate link found inside a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link<'a> {
    /// JSON pointer of the "@odata.id" field, e.g. "/Members/0/@odata.id"
    pub pointer: String,
    /// The raw identifier as written in the document
    pub target: &'a str,
}

/// Returns the document's own identity (root-level "@odata.id"), if any.
pub fn own_identifier(document: &Value) -> Option<&str> {
    document.get(ODATA_ID)?.as_str()
}

/// Lazily yields every link in the document.
///
/// The root-level "@odata.id" is included too; callers that only want
/// children drop it through the visited check.
pub fn extract_links(document: &Value) -> Links<'_> {
    Links {
        stack: vec![Frame {
            pointer: String::new(),
            key: None,
            value: document,
        }],
    }
}

/// Plain prefix check: "/redfish/v10/..." passes too and is left to the
/// scope filter and the sink.
fn is_service_path(value: &str) -> bool {
    value.starts_with(SERVICE_ROOT_PATH)
}

// Escapes a key for use in a JSON pointer (RFC 6901)
fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

struct Frame<'a> {
    pointer: String,
    key: Option<&'a str>,
    value: &'a Value,
}

/// Iterator returned by [`extract_links`].
pub struct Links<'a> {
    stack: Vec<Frame<'a>>,
}

impl<'a> Iterator for Links<'a> {
    type Item = Link<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            match frame.value {
                Value::String(s) if frame.key == Some(ODATA_ID) && is_service_path(s) => {
                    return Some(Link {
                        pointer: frame.pointer,
                        target: s.as_str(),
                    });
                }
                Value::Object(map) => {
                    // Pushed in reverse so the first key is popped first
                    for (key, value) in map.iter().rev() {
                        self.stack.push(Frame {
                            pointer: format!("{}/{}", frame.pointer, escape_pointer_token(key)),
                            key: Some(key.as_str()),
                            value,
                        });
                    }
                }
                Value::Array(items) => {
                    for (index, value) in items.iter().enumerate().rev() {
                        self.stack.push(Frame {
                            pointer: format!("{}/{}", frame.pointer, index),
                            key: None,
                            value,
                        });
                    }
                }
                _ => {}
            }
        }
        None
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is the 'a lifetime on Link and Links?
//    - Links borrows the document instead of copying it
//    - Each Link's `target` points straight into the document's strings
//    - The compiler makes sure the document outlives the iterator
//
// 2. Why an explicit stack instead of a recursive function?
//    - Recursion uses the thread's call stack, which is only a few MB
//    - A Vec lives on the heap and grows as needed
//    - It also lets us hand out one link at a time from next()
//
// 3. Why push children in reverse?
//    - A stack is last-in, first-out
//    - Pushing [a, b, c] reversed means a comes out first
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn targets(document: &Value) -> Vec<&str> {
        extract_links(document).map(|link| link.target).collect()
    }

    #[test]
    fn test_own_identifier() {
        let doc = json!({"@odata.id": "/redfish/v1/Chassis", "Name": "Chassis Collection"});
        assert_eq!(own_identifier(&doc), Some("/redfish/v1/Chassis"));
        assert_eq!(own_identifier(&json!({"Name": "x"})), None);
        assert_eq!(own_identifier(&json!({"@odata.id": 7})), None);
        assert_eq!(own_identifier(&json!(["/redfish/v1"])), None);
    }

    #[test]
    fn test_members_in_document_order() {
        let doc = json!({
            "@odata.id": "/redfish/v1/Chassis",
            "Members": [
                {"@odata.id": "/redfish/v1/Chassis/1"},
                {"@odata.id": "/redfish/v1/Chassis/2"}
            ]
        });
        assert_eq!(
            targets(&doc),
            vec!["/redfish/v1/Chassis", "/redfish/v1/Chassis/1", "/redfish/v1/Chassis/2"]
        );
    }

    #[test]
    fn test_deeply_nested_links_and_pointers() {
        let doc = json!({
            "Links": {
                "ManagedBy": [{"@odata.id": "/redfish/v1/Managers/1"}],
                "Oem": {"Vendor": {"Extra": [[{"@odata.id": "/redfish/v1/Oem/X"}]]}}
            }
        });
        let links: Vec<Link> = extract_links(&doc).collect();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].pointer, "/Links/ManagedBy/0/@odata.id");
        assert_eq!(links[0].target, "/redfish/v1/Managers/1");
        assert_eq!(links[1].pointer, "/Links/Oem/Vendor/Extra/0/0/@odata.id");
    }

    #[test]
    fn test_skips_non_links() {
        let doc = json!({
            "@odata.type": "#Chassis.v1_14_0.Chassis",
            "Description": "/redfish/v1/Chassis/1",
            "Other": {"@odata.id": "https://example.com/elsewhere"},
            "Numeric": {"@odata.id": 42},
            "Relative": {"@odata.id": "Chassis/1"}
        });
        assert!(targets(&doc).is_empty());
    }

    #[test]
    fn test_root_prefix_is_a_plain_prefix() {
        let doc = json!({
            "A": {"@odata.id": "/redfish/v1"},
            "B": {"@odata.id": "/redfish/v10/Chassis"}
        });
        assert_eq!(targets(&doc), vec!["/redfish/v1", "/redfish/v10/Chassis"]);
    }

    #[test]
    fn test_scalar_document_has_no_links() {
        assert!(targets(&json!("just a string")).is_empty());
        assert!(targets(&json!(null)).is_empty());
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let mut doc = json!({"@odata.id": "/redfish/v1/Deep"});
        for _ in 0..10_000 {
            let mut map = serde_json::Map::new();
            map.insert("Nested".to_string(), Value::Array(vec![doc]));
            doc = Value::Object(map);
        }
        assert_eq!(targets(&doc), vec!["/redfish/v1/Deep"]);
        // Dropping a 10k-deep Value recurses inside serde_json; leak it instead
        std::mem::forget(doc);
    }

    #[test]
    fn test_pointer_escaping() {
        let doc = json!({"a/b": {"~c": {"@odata.id": "/redfish/v1/X"}}});
        let link = extract_links(&doc).next().unwrap();
        assert_eq!(link.pointer, "/a~1b/~0c/@odata.id");
    }
}
