use super::validation;
use crate::db::AgentDirectory;
use crate::error::{error_response, AgentError, StoreError};
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use common::requests::AgentUpdate;
use common::responses::AgentResponse;

pub(crate) async fn process(
    id: web::Path<String>,
    state: web::Data<AppState>,
    payload: web::Json<AgentUpdate>,
) -> impl Responder {
    match update_agent(&state, id.into_inner(), payload.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => error_response(&e, state.expose_errors()),
    }
}

fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

async fn update_agent(
    state: &AppState,
    id: String,
    changes: AgentUpdate,
) -> Result<AgentResponse, AgentError> {
    let name = provided(&changes.name).map(validation::name).transpose()?;
    let email = provided(&changes.email).map(validation::email).transpose()?;
    let mobile = provided(&changes.mobile).map(validation::mobile).transpose()?;

    let store = state.store.clone();
    let agent = web::block(move || {
        let mut agent = store.get_agent(&id)?;
        if let Some(name) = name {
            agent.name = name;
        }
        if let Some(email) = email {
            agent.email = email;
        }
        if let Some(mobile) = mobile {
            agent.mobile = mobile;
        }
        store.update_agent(&agent)
    })
    .await
    .map_err(|e| StoreError::Unavailable(e.to_string()))??;

    Ok(AgentResponse {
        message: "Agent updated successfully".to_string(),
        agent: agent.summary(),
    })
}

#[cfg(test)]
mod tests {
    use crate::db::AgentDirectory;
    use crate::test_support::{read_json, state_with_agents, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use common::responses::AgentResponse;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[actix_web::test]
    async fn only_given_fields_change() {
        let state = state_with_agents(1);
        let agent = state.store.list_agents().unwrap().remove(0);
        let app = test::init_service(test_app(state)).await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/agents/{}", agent.id))
            .set_json(json!({ "mobile": "+4798765432", "name": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: AgentResponse = read_json(resp).await;
        assert_eq!(body.agent.mobile, "+4798765432");
        assert_eq!(body.agent.name, agent.name);
        assert_eq!(body.agent.email, agent.email);
    }

    #[actix_web::test]
    async fn unknown_agent_is_404() {
        let app = test::init_service(test_app(state_with_agents(0))).await;
        let req = test::TestRequest::put()
            .uri("/api/agents/nobody")
            .set_json(json!({ "name": "Ghost" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }
}
