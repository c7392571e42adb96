//! Unit tests for the typed identifiers

use core_kernel::{SubmissionId, DocumentId, EnvelopeId, QuoteId, CarrierId, AgencyId, UserId};
use uuid::Uuid;

mod submission_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        assert_ne!(SubmissionId::new(), SubmissionId::new());
    }

    #[test]
    fn test_new_is_time_ordered() {
        let id1 = SubmissionId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = SubmissionId::new();
        let uuid1: Uuid = id1.into();
        let uuid2: Uuid = id2.into();
        assert!(uuid1 < uuid2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = SubmissionId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_display_and_parse() {
        let original = SubmissionId::new();
        let string = original.to_string();
        assert!(string.starts_with("SUB-"));
        let parsed: SubmissionId = string.parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_parse_invalid() {
        assert!("SUB-not-a-uuid".parse::<SubmissionId>().is_err());
    }
}

mod prefixes {
    use super::*;

    #[test]
    fn test_all_prefixes() {
        assert_eq!(SubmissionId::prefix(), "SUB");
        assert_eq!(DocumentId::prefix(), "DOC");
        assert_eq!(EnvelopeId::prefix(), "ENV");
        assert_eq!(QuoteId::prefix(), "QTE");
        assert_eq!(CarrierId::prefix(), "CAR");
        assert_eq!(AgencyId::prefix(), "AGY");
        assert_eq!(UserId::prefix(), "USR");
    }
}

mod serde_tests {
    use super::*;

    #[test]
    fn test_serializes_as_bare_uuid() {
        let uuid = Uuid::new_v4();
        let id = QuoteId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
        let back: QuoteId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
