use serde::{Deserialize, Serialize};

/// Directory user as the Graph API returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphUser {
    pub id: String,
    pub given_name: Option<String>,
    pub display_name: Option<String>,
    pub surname: Option<String>,
    pub user_principal_name: Option<String>,
    pub job_title: Option<String>,
    pub mobile_phone: Option<String>,
    pub office_location: Option<String>,
}

/// Envelope the Graph API wraps collection responses in.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphPage<T> {
    pub value: Vec<T>,
}

/// Outbound user DTO.
///
/// `email` carries the directory's `userPrincipalName`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserModel {
    pub id: String,
    pub given_name: Option<String>,
    pub display_name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub job_title: Option<String>,
    pub mobile_phone: Option<String>,
    pub office_location: Option<String>,
}

impl From<GraphUser> for UserModel {
    fn from(user: GraphUser) -> Self {
        Self {
            id: user.id,
            given_name: user.given_name,
            display_name: user.display_name,
            surname: user.surname,
            email: user.user_principal_name,
            job_title: user.job_title,
            mobile_phone: user.mobile_phone,
            office_location: user.office_location,
        }
    }
}
