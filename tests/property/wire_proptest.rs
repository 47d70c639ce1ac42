//! Property-based tests for identifiers and socket events

use proptest::prelude::*;
use xfchat::shared::{ServerEvent, UserId, ONLINE_USERS_EVENT};

proptest! {
    #[test]
    fn test_plain_ids_are_accepted(raw in "[A-Za-z0-9_-]{1,64}") {
        prop_assume!(raw != "null" && raw != "undefined");
        let id = UserId::parse(&raw).unwrap();
        prop_assert_eq!(id.as_str(), raw.as_str());
    }

    #[test]
    fn test_ids_with_whitespace_are_rejected(prefix in "[a-z]{0,10}", suffix in "[a-z]{0,10}", ws in "[ \t\n]") {
        let raw = format!("{}{}{}", prefix, ws, suffix);
        prop_assert!(UserId::parse(&raw).is_err());
    }

    #[test]
    fn test_presence_event_shape(ids in prop::collection::btree_set("[a-z0-9]{1,12}", 0..8)) {
        prop_assume!(!ids.contains("null") && !ids.contains("undefined"));
        let users: Vec<UserId> = ids.iter().map(|raw| UserId::parse(raw).unwrap()).collect();
        let json = ServerEvent::OnlineUsers(users).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(value["event"].as_str(), Some(ONLINE_USERS_EVENT));
        let data: Vec<&str> = value["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        let expected: Vec<&str> = ids.iter().map(String::as_str).collect();
        prop_assert_eq!(data, expected);
    }
}
