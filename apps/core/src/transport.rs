use serde::{Deserialize, Serialize};

use crate::contract::{CoreRequest, CoreResponse, EffectDto, ViewDto};
use crate::core_service::{CoreService, ServiceError};
use crate::launcher_state::LauncherEvent;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    InvalidRequest,
    Launch,
    Store,
    Config,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransportResponse {
    Ok { response: CoreResponse },
    Err { error: ErrorResponse },
}

pub fn handle_request(service: &mut CoreService, request: CoreRequest) -> TransportResponse {
    service.poll_catalog();
    match dispatch(service, request) {
        Ok(effect) => TransportResponse::Ok {
            response: CoreResponse {
                effect,
                view: ViewDto::from(service.state()),
            },
        },
        Err(error) => TransportResponse::Err {
            error: map_service_error(error),
        },
    }
}

fn dispatch(service: &mut CoreService, request: CoreRequest) -> Result<EffectDto, ServiceError> {
    let event = match request {
        CoreRequest::Snapshot => return Ok(EffectDto::None),
        CoreRequest::Rescan => {
            let items = service.rebuild_catalog();
            return Ok(EffectDto::Rescan { items });
        }
        CoreRequest::ActivateAt { index } => {
            let len = service.state().flattened().len();
            if index >= len {
                return Err(ServiceError::InvalidRequest(format!(
                    "index out of range: {index} (len={len})"
                )));
            }
            LauncherEvent::ActivateAt(index)
        }
        CoreRequest::Toggle { has_focus } => LauncherEvent::Toggle { has_focus },
        CoreRequest::Escape => LauncherEvent::Escape,
        CoreRequest::Query { text } => LauncherEvent::QueryChanged(text),
        CoreRequest::Navigate { key } => LauncherEvent::Navigate(key.into()),
        CoreRequest::Activate => LauncherEvent::Activate,
    };

    service.handle(event).map(EffectDto::from)
}

pub fn handle_json(service: &mut CoreService, payload: &str) -> String {
    let response = match serde_json::from_str::<CoreRequest>(payload) {
        Ok(request) => handle_request(service, request),
        Err(error) => TransportResponse::Err {
            error: ErrorResponse {
                code: ErrorCode::InvalidJson,
                message: error.to_string(),
            },
        },
    };

    encode_response(&response)
}

fn encode_response(response: &TransportResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|error| {
        crate::logging::error(&format!("[transport] response encode failed: {error}"));
        r#"{"status":"err","error":{"code":"invalid_request","message":"response encode failed"}}"#
            .to_string()
    })
}

fn map_service_error(error: ServiceError) -> ErrorResponse {
    match error {
        ServiceError::InvalidRequest(message) => ErrorResponse {
            code: ErrorCode::InvalidRequest,
            message,
        },
        ServiceError::Launch(message) => ErrorResponse {
            code: ErrorCode::Launch,
            message: message.to_string(),
        },
        ServiceError::Store(message) => ErrorResponse {
            code: ErrorCode::Store,
            message: message.to_string(),
        },
        ServiceError::Config(message) => ErrorResponse {
            code: ErrorCode::Config,
            message,
        },
    }
}
