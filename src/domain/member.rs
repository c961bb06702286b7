// ==========================================
// Panitia Engine - member and commission models
// ==========================================
// Members and commissions are reference data: the engine reads them,
// assignment rows snapshot them, nothing in the engine mutates them.
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Member - an active participant of the organization
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub member_id: String,             // member ID (uuid)
    pub name: String,                  // display name
    pub commission_id: Option<String>, // commission affiliation (nullable)
    pub is_active: bool,               // only active members are candidates
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// ==========================================
// Commission - named grouping of members
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commission {
    pub commission_id: String,       // commission ID
    pub name: String,                // unique name (e.g. "Komisi B")
    pub description: Option<String>, // free-form description
    pub created_at: NaiveDateTime,
}
