use crate::auth::CurrentUser;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::message::{ConversationResponse, MessageResponse, SendMessageRequest, SendMessageResponse};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{routes, State};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[rocket::get("/")]
pub async fn list_conversations(pool: &State<PgPool>, user: CurrentUser) -> Result<Json<Vec<ConversationResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let conversations = repo.list_conversations(&user.id).await?;

    Ok(Json(conversations.iter().map(ConversationResponse::from).collect()))
}

/// Thread with one partner. Fetching it marks the incoming side as read.
#[rocket::get("/<partner_id>")]
pub async fn get_thread(pool: &State<PgPool>, user: CurrentUser, partner_id: Uuid) -> Result<Json<Vec<MessageResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let messages = repo.list_thread(&user.id, &partner_id).await?;

    Ok(Json(messages.iter().map(|m| MessageResponse::for_viewer(m, user.id)).collect()))
}

#[rocket::post("/", data = "<payload>")]
pub async fn send_message(pool: &State<PgPool>, user: CurrentUser, payload: Json<SendMessageRequest>) -> Result<(Status, Json<SendMessageResponse>), AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let message = repo.send_message(&user.id, &user.name, &payload.recipient_id, &payload.message).await?;

    Ok((
        Status::Created,
        Json(SendMessageResponse {
            id: message.id,
            status: "sent".to_string(),
            created_at: message.created_at,
        }),
    ))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![list_conversations, get_thread, send_message]
}

#[cfg(test)]
mod tests {
    use crate::{build_rocket, Config};
    use rocket::http::{Header, Status};
    use rocket::local::asynchronous::Client;
    use uuid::Uuid;

    fn bearer(token: &str) -> Header<'static> {
        Header::new("Authorization", format!("Bearer {token}"))
    }

    async fn signup(client: &Client, name: &str) -> (String, Uuid) {
        let email = format!("{name}-{}@example.com", Uuid::new_v4());
        let response = client
            .post("/api/auth/signup")
            .json(&serde_json::json!({
                "email": email,
                "name": name,
                "password": "correct horse battery staple",
            }))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);
        let body: serde_json::Value = response.into_json().await.expect("auth response");
        let token = body["access_token"].as_str().expect("token").to_string();

        let me = client.get("/api/auth/me").header(bearer(&token)).dispatch().await;
        let me: serde_json::Value = me.into_json().await.expect("me response");
        let user_id = me["user_id"].as_str().and_then(|s| Uuid::parse_str(s).ok()).expect("user id");

        (token, user_id)
    }

    #[rocket::async_test]
    #[ignore = "requires database"]
    async fn sending_a_message_threads_and_notifies_the_recipient() {
        let config = Config::load().expect("valid configuration");
        let client = Client::tracked(build_rocket(config)).await.expect("valid rocket instance");

        let (sender_token, sender_id) = signup(&client, "sender").await;
        let (recipient_token, recipient_id) = signup(&client, "recipient").await;

        let sent = client
            .post("/api/messages")
            .header(bearer(&sender_token))
            .json(&serde_json::json!({ "recipient_id": recipient_id, "message": "hello there" }))
            .dispatch()
            .await;
        assert_eq!(sent.status(), Status::Created);

        // The recipient sees one unread conversation with the sender.
        let conversations = client.get("/api/messages").header(bearer(&recipient_token)).dispatch().await;
        assert_eq!(conversations.status(), Status::Ok);
        let conversations: serde_json::Value = conversations.into_json().await.expect("conversations");
        let conversation = &conversations.as_array().expect("array")[0];
        assert_eq!(conversation["user_id"], sender_id.to_string());
        assert_eq!(conversation["last_message"], "hello there");
        assert_eq!(conversation["unread"], true);

        // The send also produced a notification for the recipient.
        let unread = client.get("/api/notifications/unread-count").header(bearer(&recipient_token)).dispatch().await;
        let unread: serde_json::Value = unread.into_json().await.expect("unread count");
        assert!(unread["unread_count"].as_i64().expect("count") >= 1);

        // Opening the thread marks the incoming message as read.
        let thread = client
            .get(format!("/api/messages/{sender_id}"))
            .header(bearer(&recipient_token))
            .dispatch()
            .await;
        assert_eq!(thread.status(), Status::Ok);
        let thread: serde_json::Value = thread.into_json().await.expect("thread");
        assert_eq!(thread.as_array().expect("array").len(), 1);
        assert_eq!(thread[0]["is_mine"], false);

        let conversations = client.get("/api/messages").header(bearer(&recipient_token)).dispatch().await;
        let conversations: serde_json::Value = conversations.into_json().await.expect("conversations");
        assert_eq!(conversations[0]["unread"], false);
    }

    #[rocket::async_test]
    #[ignore = "requires database"]
    async fn messaging_an_unknown_user_is_not_found() {
        let config = Config::load().expect("valid configuration");
        let client = Client::tracked(build_rocket(config)).await.expect("valid rocket instance");

        let (sender_token, _) = signup(&client, "sender").await;

        let sent = client
            .post("/api/messages")
            .header(bearer(&sender_token))
            .json(&serde_json::json!({ "recipient_id": Uuid::new_v4(), "message": "hello?" }))
            .dispatch()
            .await;
        assert_eq!(sent.status(), Status::NotFound);
    }
}
