//! Domain records served by the fleet backend.
//!
//! # Design
//! Plain serde records with no behavior. They mirror the mock-server's schema
//! but are defined independently; integration tests catch schema drift.

use serde::{Deserialize, Serialize};

/// Squadrons a platform or user can be assigned to.
pub const SQUADRONS: &[&str] = &[
    "No. 216 Squadron",
    "No. 31 Squadron",
    "No. 17 Test & Evaluation Squadron",
    "No. 54 Squadron",
    "Leonardo Flight Systems",
    "RCO Prototyping Unit",
];

/// An autonomous combat platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Acp {
    pub id: u64,
    pub code: String,
    pub name: String,
    pub squadron: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAcp {
    pub name: String,
    pub code: String,
    pub description: String,
    pub squadron: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    Active,
    Inactive,
}

/// A recurring operational window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MissionWindow {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub status: MissionStatus,
    pub capacity: u32,
    pub acp_profile_id: u64,
    pub commander_id: String,
    #[serde(default)]
    pub operator_id: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
    #[serde(default)]
    pub auth_code: Option<String>,
    #[serde(default)]
    pub windows: Vec<MissionWindow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMission {
    pub name: String,
    pub description: String,
    pub status: MissionStatus,
    pub capacity: u32,
    pub acp_profile_id: u64,
    pub commander_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_code: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub windows: Vec<MissionWindow>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Operator,
    Commander,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default)]
    pub squadron: Option<String>,
}
