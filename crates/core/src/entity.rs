//! Entity model identifiers
//!
//! Postings carry numeric namespace, type and attribute ids. This module
//! defines those ids as newtypes, the structured [`TypeRef`] callers use to
//! name a type, and the closed set of [`EntityKind`]s that results are
//! grouped by.
//!
//! The mapping from `(AppId, TypeId)` to an [`EntityKind`] is spelled out in
//! [`EntityKind::from_ids`]. It is not derived from the registry: a type can
//! be registered (and therefore usable in a restriction) without having a
//! result bucket.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

/// Namespace (application) id of an entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AppId(pub u16);

/// Type id of an entity type within its namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u16);

/// Id of the attribute (field) a token was indexed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributeId(pub u16);

/// Reference to an entity type by namespace and type name
///
/// # Examples
///
/// ```
/// use cipherdex_core::entity::TypeRef;
///
/// let contact = TypeRef::new("mail", "Contact");
/// assert_eq!(contact, TypeRef::CONTACT);
/// assert_eq!(contact.to_string(), "mail/Contact");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeRef {
    /// Namespace the type lives in
    pub app: Cow<'static, str>,
    /// Type name within the namespace
    pub name: Cow<'static, str>,
}

impl TypeRef {
    /// Reference to the mail type
    pub const MAIL: TypeRef = TypeRef::from_static("mail", "Mail");
    /// Reference to the contact type
    pub const CONTACT: TypeRef = TypeRef::from_static("mail", "Contact");

    /// Create a type reference from owned or borrowed names
    pub fn new(app: impl Into<Cow<'static, str>>, name: impl Into<Cow<'static, str>>) -> Self {
        TypeRef {
            app: app.into(),
            name: name.into(),
        }
    }

    /// Create a type reference from static names in const context
    pub const fn from_static(app: &'static str, name: &'static str) -> Self {
        TypeRef {
            app: Cow::Borrowed(app),
            name: Cow::Borrowed(name),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app, self.name)
    }
}

/// Resolved numeric identity of an entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Namespace id
    pub app: AppId,
    /// Type id
    pub type_id: TypeId,
    /// Attributes the type declares
    pub attributes: BTreeSet<AttributeId>,
}

impl TypeInfo {
    /// Whether the type declares the attribute
    pub fn has_attribute(&self, attribute: AttributeId) -> bool {
        self.attributes.contains(&attribute)
    }
}

/// Namespace id shared by mail and contact types
pub const MAIL_APP: AppId = AppId(1);

/// Attribute ids of the mail type
pub mod mail_attributes {
    use super::AttributeId;

    /// Subject line
    pub const SUBJECT: AttributeId = AttributeId(1);
    /// Body text
    pub const BODY: AttributeId = AttributeId(2);
    /// To recipients
    pub const TO_RECIPIENTS: AttributeId = AttributeId(3);
    /// Cc recipients
    pub const CC_RECIPIENTS: AttributeId = AttributeId(4);
    /// Bcc recipients
    pub const BCC_RECIPIENTS: AttributeId = AttributeId(5);
    /// Sender
    pub const SENDER: AttributeId = AttributeId(6);
    /// Attachment file names
    pub const ATTACHMENTS: AttributeId = AttributeId(7);

    pub(crate) const ALL: [AttributeId; 7] = [
        SUBJECT,
        BODY,
        TO_RECIPIENTS,
        CC_RECIPIENTS,
        BCC_RECIPIENTS,
        SENDER,
        ATTACHMENTS,
    ];
}

/// Attribute ids of the contact type
pub mod contact_attributes {
    use super::AttributeId;

    /// First name
    pub const FIRST_NAME: AttributeId = AttributeId(1);
    /// Last name
    pub const LAST_NAME: AttributeId = AttributeId(2);
    /// Company
    pub const COMPANY: AttributeId = AttributeId(3);
    /// Mail addresses
    pub const MAIL_ADDRESSES: AttributeId = AttributeId(4);
    /// Phone numbers
    pub const PHONE_NUMBERS: AttributeId = AttributeId(5);
    /// Free-text comment
    pub const COMMENT: AttributeId = AttributeId(6);

    pub(crate) const ALL: [AttributeId; 6] = [
        FIRST_NAME,
        LAST_NAME,
        COMPANY,
        MAIL_ADDRESSES,
        PHONE_NUMBERS,
        COMMENT,
    ];
}

/// Result bucket an entity is grouped into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Mails
    Mail,
    /// Contacts
    Contact,
}

impl EntityKind {
    /// Every kind, in bucket order
    pub const ALL: [EntityKind; 2] = [EntityKind::Mail, EntityKind::Contact];

    /// Bucket for a posting's `(app, type)` pair
    ///
    /// Returns `None` for types that have no bucket. The engine drops such
    /// entities from the result instead of inventing a catch-all bucket.
    pub fn from_ids(app: AppId, type_id: TypeId) -> Option<EntityKind> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.app() == app && kind.type_id() == type_id)
    }

    /// Namespace id of the kind's type
    pub const fn app(self) -> AppId {
        MAIL_APP
    }

    /// Type id of the kind's type
    pub const fn type_id(self) -> TypeId {
        match self {
            EntityKind::Mail => TypeId(97),
            EntityKind::Contact => TypeId(64),
        }
    }

    /// Type reference naming the kind's type
    pub const fn type_ref(self) -> TypeRef {
        match self {
            EntityKind::Mail => TypeRef::MAIL,
            EntityKind::Contact => TypeRef::CONTACT,
        }
    }

    /// Attributes the kind's type declares
    pub const fn attributes(self) -> &'static [AttributeId] {
        match self {
            EntityKind::Mail => &mail_attributes::ALL,
            EntityKind::Contact => &contact_attributes::ALL,
        }
    }

    /// Full type info for the kind
    pub fn type_info(self) -> TypeInfo {
        TypeInfo {
            app: self.app(),
            type_id: self.type_id(),
            attributes: self.attributes().iter().copied().collect(),
        }
    }

    /// Stable lowercase name
    pub const fn as_str(self) -> &'static str {
        match self {
            EntityKind::Mail => "mail",
            EntityKind::Contact => "contact",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
