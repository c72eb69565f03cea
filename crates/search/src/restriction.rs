//! Restriction predicate
//!
//! A [`Restriction`] names a type by reference. It is resolved against the
//! registry once per search into a [`ResolvedRestriction`], after which
//! filtering a posting is a pure comparison of numeric ids.

use cipherdex_core::{
    AppId, AttributeId, Posting, Restriction, Result, SearchError, TypeId, TypeRegistry,
};
use std::collections::BTreeSet;

/// Restriction with its type resolved to numeric ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRestriction {
    /// Required namespace id
    pub app: AppId,
    /// Required type id
    pub type_id: TypeId,
    /// Accepted attributes; empty accepts any
    pub attributes: BTreeSet<AttributeId>,
}

impl ResolvedRestriction {
    /// Resolve a restriction against a registry
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidRestriction`] if the type is not
    /// registered, or if an attribute is not declared by the type.
    pub fn resolve(restriction: &Restriction, registry: &dyn TypeRegistry) -> Result<Self> {
        let info = registry
            .lookup(&restriction.type_ref)
            .map_err(|e| SearchError::InvalidRestriction {
                type_ref: restriction.type_ref.clone(),
                reason: e.to_string(),
            })?;

        if let Some(unknown) = restriction
            .attributes
            .iter()
            .find(|attr| !info.has_attribute(**attr))
        {
            return Err(SearchError::InvalidRestriction {
                type_ref: restriction.type_ref.clone(),
                reason: format!("attribute {} is not declared by the type", unknown.0),
            });
        }

        Ok(ResolvedRestriction {
            app: info.app,
            type_id: info.type_id,
            attributes: restriction.attributes.clone(),
        })
    }

    /// Whether a posting satisfies the restriction
    pub fn admits(&self, posting: &Posting) -> bool {
        posting.app == self.app
            && posting.type_id == self.type_id
            && (self.attributes.is_empty() || self.attributes.contains(&posting.attribute))
    }
}

/// Whether a posting survives an optional restriction
///
/// No restriction admits everything.
pub fn is_included(restriction: Option<&ResolvedRestriction>, posting: &Posting) -> bool {
    restriction.map_or(true, |r| r.admits(posting))
}
