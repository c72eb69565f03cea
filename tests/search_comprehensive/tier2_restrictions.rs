//! Tier 2: Restrictions
//!
//! Validates type/attribute restrictions and their interaction with the
//! logical-id intersection.

use crate::common::*;

fn people() -> TestIndex {
    let index = TestIndex::new();
    index.add(&[
        contact("c1", "Jordan", "Lee"),
        contact("c2", "Lee", "Jordan"),
        mail("m1", "meeting with jordan lee"),
    ]);
    index
}

/// Type-only restriction removes other kinds
#[tokio::test]
async fn test_tier2_type_restriction() {
    let result = people()
        .engine()
        .search("jordan", Some(Restriction::new(TypeRef::CONTACT)))
        .await
        .unwrap();
    assert_eq!(contact_ids(&result), vec!["c1", "c2"]);
    assert!(result.buckets.mails.is_empty());
}

/// Attribute restriction only accepts postings from listed attributes
#[tokio::test]
async fn test_tier2_attribute_restriction() {
    let restriction =
        Restriction::new(TypeRef::CONTACT).with_attributes([contact_attributes::LAST_NAME]);
    let result = people()
        .engine()
        .search("jordan", Some(restriction.clone()))
        .await
        .unwrap();
    assert_eq!(contact_ids(&result), vec!["c2"]);
    assert_eq!(result.restriction, Some(restriction));
}

/// Every token must match within the allowed attributes
///
/// c1 has "jordan" only as first name, so restricting to last names removes
/// its only posting for that token and it fails the second intersection.
#[tokio::test]
async fn test_tier2_restriction_applies_per_token() {
    let restriction =
        Restriction::new(TypeRef::CONTACT).with_attributes([contact_attributes::LAST_NAME]);
    let result = people()
        .engine()
        .search("jordan lee", Some(restriction))
        .await
        .unwrap();
    assert!(result.is_empty());
}

/// Several attributes are alternatives
#[tokio::test]
async fn test_tier2_attribute_set_is_any_of() {
    let restriction = Restriction::new(TypeRef::CONTACT).with_attributes([
        contact_attributes::FIRST_NAME,
        contact_attributes::LAST_NAME,
    ]);
    let result = people()
        .engine()
        .search("jordan lee", Some(restriction))
        .await
        .unwrap();
    assert_eq!(contact_ids(&result), vec!["c1", "c2"]);
}

/// Restricting to mails with an attribute
#[tokio::test]
async fn test_tier2_mail_subject_restriction() {
    let index = TestIndex::new();
    index.add(&[
        IndexDocument::new(EntityKind::Mail, "m1", "inbox")
            .field(mail_attributes::SUBJECT, "offsite"),
        IndexDocument::new(EntityKind::Mail, "m2", "inbox")
            .field(mail_attributes::BODY, "see you at the offsite"),
    ]);

    let restriction =
        Restriction::new(TypeRef::MAIL).with_attributes([mail_attributes::SUBJECT]);
    let result = index
        .engine()
        .search("offsite", Some(restriction))
        .await
        .unwrap();
    assert_eq!(mail_ids(&result), vec!["m1"]);
}

/// Unknown type references are rejected
#[tokio::test]
async fn test_tier2_unregistered_type() {
    let err = people()
        .engine()
        .search("jordan", Some(Restriction::new(TypeRef::new("tutanota", "Contact"))))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), SearchErrorKind::InvalidRestriction);
}

/// Attributes the type does not declare are rejected
#[tokio::test]
async fn test_tier2_undeclared_attribute() {
    let restriction = Restriction::new(TypeRef::CONTACT).with_attributes([AttributeId(99)]);
    let err = people()
        .engine()
        .search("jordan", Some(restriction))
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::InvalidRestriction { .. }));
}

/// An invalid restriction fails without reading the store
#[tokio::test]
async fn test_tier2_invalid_restriction_before_reads() {
    let index = people();
    let engine = index.engine();
    index.store.fail_reads(true);

    let err = engine
        .search("jordan", Some(Restriction::new(TypeRef::new("x", "Y"))))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), SearchErrorKind::InvalidRestriction);
}

/// Restricting the invoice/march example to contacts leaves nothing
#[tokio::test]
async fn test_tier2_contact_restriction_on_mail_matches() {
    let index = TestIndex::new();
    index.add(&[
        mail("A", "invoice"),
        mail("B", "invoice march"),
        mail("C", "invoice march"),
        mail("D", "march"),
    ]);

    let result = index
        .engine()
        .search("invoice march", Some(Restriction::new(TypeRef::CONTACT)))
        .await
        .unwrap();
    assert!(result.buckets.mails.is_empty());
    assert!(result.buckets.contacts.is_empty());
    assert_eq!(result.stats.encrypted_candidates, 2);
    assert_eq!(result.stats.restricted, 0);
}
