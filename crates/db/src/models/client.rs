//! Client entity model and DTOs.
//!
//! Clients are maintained by the CRM. The ownership engine only reads the
//! department and contact address.

use fieldops_core::directory::ClientProfile;
use fieldops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub name: String,
    pub department: Option<String>,
    pub contact_email: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Client> for ClientProfile {
    fn from(client: Client) -> Self {
        ClientProfile {
            id: client.id,
            name: client.name,
            department: client.department,
            contact_email: client.contact_email,
        }
    }
}

/// DTO for creating a new client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClient {
    pub name: String,
    pub department: Option<String>,
    pub contact_email: Option<String>,
}
