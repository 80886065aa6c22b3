use super::validation;
use crate::error::{error_response, AgentError, StoreError};
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use common::requests::NewAgent;
use common::responses::AgentResponse;
use log::info;

pub(crate) async fn process(state: web::Data<AppState>, payload: web::Json<NewAgent>) -> impl Responder {
    match create_agent(&state, payload.into_inner()).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => error_response(&e, state.expose_errors()),
    }
}

async fn create_agent(state: &AppState, payload: NewAgent) -> Result<AgentResponse, AgentError> {
    let name = validation::name(&payload.name)?;
    let email = validation::email(&payload.email)?;
    let mobile = validation::mobile(&payload.mobile)?;

    let store = state.store.clone();
    let agent = web::block(move || store.create_agent(&name, &email, &mobile))
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))??;

    info!("registered agent {} <{}>", agent.id, agent.email);
    Ok(AgentResponse {
        message: "Agent created successfully".to_string(),
        agent: agent.summary(),
    })
}

#[cfg(test)]
mod tests {
    use crate::test_support::{read_json, state_with_agents, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use common::responses::{AgentResponse, MessageResponse};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[actix_web::test]
    async fn valid_agent_is_created() {
        let app = test::init_service(test_app(state_with_agents(0))).await;
        let req = test::TestRequest::post()
            .uri("/api/agents/add")
            .set_json(json!({ "name": "Ann", "email": "Ann@Example.com", "mobile": "+14155550123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: AgentResponse = read_json(resp).await;
        assert_eq!(body.agent.email, "ann@example.com");
        assert_eq!(body.agent.mobile, "+14155550123");
    }

    #[actix_web::test]
    async fn invalid_input_and_duplicates_are_rejected() {
        let app = test::init_service(test_app(state_with_agents(1))).await;
        let cases = [
            (json!({ "name": "Bob", "email": "bob@example.com", "mobile": "5550123" }),
             "Mobile number must be in international format with country code (e.g., +1234567890)"),
            (json!({ "name": "", "email": "bob@example.com", "mobile": "+14155550123" }),
             "Name is required"),
            (json!({ "name": "Bob", "email": "AGENT0@example.com", "mobile": "+14155550123" }),
             "Agent with this email already exists"),
        ];

        for (payload, expected) in cases {
            let req = test::TestRequest::post()
                .uri("/api/agents/add")
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: MessageResponse = read_json(resp).await;
            assert_eq!(body.message, expected);
        }
    }

    #[actix_web::test]
    async fn malformed_bodies_get_json_messages() {
        let app = test::init_service(test_app(state_with_agents(0))).await;
        let cases = [
            (r#"{"name":"Ann","email":"a@b.co"}"#, "All fields are required"),
            (r#"{"name":"Ann","#, "Invalid request body"),
        ];

        for (payload, expected) in cases {
            let req = test::TestRequest::post()
                .uri("/api/agents/add")
                .insert_header(("content-type", "application/json"))
                .set_payload(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", payload);
            let body: MessageResponse = read_json(resp).await;
            assert_eq!(body.message, expected);
        }
    }
}
