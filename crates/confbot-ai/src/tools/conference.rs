//! Catalog lookups exposed to the model.

use confbot_program::Catalog;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ToolHandler, ToolInvocationError};
use crate::ToolDefinition;

/// `getExperts`: every speaker with their company.
pub struct GetExperts;

impl ToolHandler for GetExperts {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "getExperts".into(),
            description: "Returns a list of experts speaking at the conference. Experts are \
                people who are speaking at one or more sessions. The function also returns \
                the company where the expert works."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    fn call(&self, _arguments: &str, catalog: &Catalog) -> Result<Value, ToolInvocationError> {
        Ok(json!(catalog.experts()))
    }
}

/// `getSessionsByExpert`: name and time window of each session an expert speaks at.
pub struct GetSessionsByExpert;

#[derive(Debug, Deserialize)]
struct SessionsByExpertArgs {
    forename: Option<String>,
    surname: Option<String>,
}

impl ToolHandler for GetSessionsByExpert {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "getSessionsByExpert".into(),
            description: "Returns a list of sessions that a given expert is speaking at. \
                Each record contains the session name, and the start and end time of the \
                session. The list of experts can be obtained using the `getExperts` function."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "forename": {
                        "type": "string",
                        "description": "The forename (aka firstname) of the expert"
                    },
                    "surname": {
                        "type": "string",
                        "description": "The surname (aka lastname) of the expert"
                    }
                },
                "required": ["forename", "surname"]
            }),
        }
    }

    fn call(&self, arguments: &str, catalog: &Catalog) -> Result<Value, ToolInvocationError> {
        let args: Option<SessionsByExpertArgs> =
            serde_json::from_str(arguments).map_err(|_| ToolInvocationError::InvalidArguments)?;
        let (forename, surname) = match args {
            Some(SessionsByExpertArgs {
                forename: Some(forename),
                surname: Some(surname),
            }) if !forename.is_empty() && !surname.is_empty() => (forename, surname),
            _ => return Err(ToolInvocationError::InvalidArguments),
        };
        Ok(json!(catalog.sessions_by_expert(&forename, &surname)))
    }
}
