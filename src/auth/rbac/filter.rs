//! View-level redaction of user and store records
//!
//! These transforms are not authorization decisions. They strip sensitive
//! fields and attach capability flags the frontend uses to decide which
//! controls to render.

use super::permissions::{
    PROFILE_UPDATE, RATING_CREATE, STORE_DELETE, STORE_MANAGE_OWN, STORE_UPDATE,
    STORE_VIEW_RATINGS, USER_DELETE, USER_UPDATE,
};
use super::system::RbacSystem;
use super::types::{ResourceType, Role};
use crate::auth::types::Actor;
use crate::storage::models::{StoreRecord, UserRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// User record as shown to a particular viewer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub is_self: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_change_role: bool,
}

/// Store record as shown to a particular viewer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreView {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub average_rating: Option<f64>,
    pub rating_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    pub is_owner: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_view_ratings: bool,
    pub can_rate: bool,
}

impl RbacSystem {
    /// Shape a user record for `viewer`
    ///
    /// The password hash never leaves this function. Contact details are
    /// kept only for the record's owner and the top-authority role.
    pub fn filter_user_data(&self, viewer: &Actor, record: &UserRecord) -> UserView {
        let is_self = viewer.id == record.id;
        let full_view =
            self.can_access_resource_by_ownership(viewer.role, viewer.id, record.id, &ResourceType::User);
        let target_role = Role::parse(&record.role);
        let outranks_target = target_role
            .map(|target| self.can_manage_user(viewer.role, target))
            .unwrap_or(false);

        let can_edit = (is_self && self.has_permission(viewer.role, &PROFILE_UPDATE))
            || (outranks_target && self.has_permission(viewer.role, &USER_UPDATE));
        let can_delete =
            !is_self && outranks_target && self.has_permission(viewer.role, &USER_DELETE);
        let can_change_role = !is_self
            && outranks_target
            && target_role
                .map(|target| self.can_assign_role(viewer.role, target))
                .unwrap_or(false);

        UserView {
            id: record.id,
            name: record.name.clone(),
            role: record.role.clone(),
            email: full_view.then(|| record.email.clone()),
            address: if full_view { record.address.clone() } else { None },
            created_at: full_view.then_some(record.created_at),
            is_self,
            can_edit,
            can_delete,
            can_change_role,
        }
    }

    /// Shape a store record for `viewer`
    ///
    /// The owner reference is only exposed to the owner itself and the
    /// top-authority role.
    pub fn filter_store_data(&self, viewer: &Actor, record: &StoreRecord) -> StoreView {
        let is_owner = record.owner_id == Some(viewer.id);
        let is_top = self.is_top_authority(viewer.role);

        let can_edit = self.has_permission(viewer.role, &STORE_UPDATE)
            || (is_owner && self.has_permission(viewer.role, &STORE_MANAGE_OWN));
        let can_view_ratings =
            (is_top || is_owner) && self.has_permission(viewer.role, &STORE_VIEW_RATINGS);
        let can_rate = !is_owner && self.has_permission(viewer.role, &RATING_CREATE);

        StoreView {
            id: record.id,
            name: record.name.clone(),
            email: record.email.clone(),
            address: record.address.clone(),
            average_rating: record.average_rating,
            rating_count: record.rating_count,
            owner_id: if is_top || is_owner {
                record.owner_id
            } else {
                None
            },
            is_owner,
            can_edit,
            can_delete: self.has_permission(viewer.role, &STORE_DELETE),
            can_view_ratings,
            can_rate,
        }
    }
}
