//! Domain identifier types
//!
//! Newtype wrappers for the identifiers flowing through the export pipeline.
//! Each type rejects empty values and prevents mixing different kinds of ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident, $label:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from a string
            ///
            /// # Errors
            ///
            /// Returns an error if the value is empty or whitespace-only.
            pub fn new(id: impl Into<String>) -> Result<Self, String> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(concat!($label, " cannot be empty").to_string());
                }
                Ok(Self(id))
            }

            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes self and returns the inner String
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a master plan subject to public review
    PlanId,
    "Plan ID"
);

string_id!(
    /// Identifier of a public review period attached to one plan
    ReviewId,
    "Review ID"
);

string_id!(
    /// Identifier of a citizen objection filed during a review period
    ObjectionId,
    "Objection ID"
);

string_id!(
    /// Identifier of an attachment's metadata record
    AttachmentId,
    "Attachment ID"
);

string_id!(
    /// Opaque reference into the blob store holding an attachment's bytes
    BlobRef,
    "Blob reference"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_id_valid() {
        let id = PlanId::new("plan-123").unwrap();
        assert_eq!(id.as_str(), "plan-123");
        assert_eq!(id.to_string(), "plan-123");
    }

    #[test]
    fn test_plan_id_empty_rejected() {
        assert!(PlanId::new("").is_err());
        assert!(PlanId::new("   ").is_err());
    }

    #[test]
    fn test_objection_id_from_str() {
        let id = ObjectionId::from_str("obj-1").unwrap();
        assert_eq!(id.as_ref(), "obj-1");
    }

    #[test]
    fn test_attachment_id_into_inner() {
        let id = AttachmentId::new("att-9").unwrap();
        assert_eq!(id.into_inner(), "att-9");
    }

    #[test]
    fn test_blob_ref_equality() {
        let a = BlobRef::new("blob-1").unwrap();
        let b = BlobRef::new("blob-1").unwrap();
        assert_eq!(a, b);
    }
}
