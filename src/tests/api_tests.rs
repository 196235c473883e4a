#[cfg(test)]
mod tests {
    use crate::{
        api::create_router,
        db::processed,
        service::SqliteWalletRegistry,
        state::AppState,
        tests::fixtures::*,
    };
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use serde_json::{json, Value};
    use sqlx::SqlitePool;
    use std::sync::Arc;

    async fn spawn_app(pool: SqlitePool) -> String {
        let state = Arc::new(AppState {
            db_pool: pool.clone(),
            registry: Arc::new(SqliteWalletRegistry::new(pool)),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, create_router(state)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_health() {
        let base = spawn_app(memory_pool().await).await;

        let body: Value = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body, json!({ "data": "ok" }));
    }

    #[tokio::test]
    async fn test_register_and_list_wallets() {
        let base = spawn_app(memory_pool().await).await;
        let http = reqwest::Client::new();

        let created = http
            .post(format!("{}/wallets", base))
            .json(&json!({ "chat_id": CHAT_A, "address": format!(" {} ", WALLET_A) }))
            .send()
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let body: Value = created.json().await.unwrap();
        assert_eq!(body["data"]["native_address"], json!(WALLET_A));
        assert_eq!(body["data"]["token_address"], json!(WALLET_A));

        let same_chat = http
            .post(format!("{}/wallets", base))
            .json(&json!({ "chat_id": CHAT_A, "address": WALLET_B }))
            .send()
            .await
            .unwrap();
        assert_eq!(same_chat.status(), StatusCode::CONFLICT);

        let same_address = http
            .post(format!("{}/wallets", base))
            .json(&json!({ "chat_id": CHAT_B, "address": WALLET_A }))
            .send()
            .await
            .unwrap();
        assert_eq!(same_address.status(), StatusCode::CONFLICT);

        let listed: Value = http
            .get(format!("{}/wallets", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(listed["data"].as_array().unwrap().len(), 1);
        assert_eq!(listed["data"][0]["chat_id"], json!(CHAT_A));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_input() {
        let base = spawn_app(memory_pool().await).await;
        let http = reqwest::Client::new();

        // Checksum of the last character is off
        let bad_address = http
            .post(format!("{}/wallets", base))
            .json(&json!({ "chat_id": CHAT_A, "address": "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6u" }))
            .send()
            .await
            .unwrap();
        assert_eq!(bad_address.status(), StatusCode::BAD_REQUEST);

        let zero_chat = http
            .post(format!("{}/wallets", base))
            .json(&json!({ "chat_id": 0, "address": WALLET_A }))
            .send()
            .await
            .unwrap();
        assert_eq!(zero_chat.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_transaction_status() {
        let pool = memory_pool().await;
        processed::insert_if_absent(&pool, "seen-tx", Some("token"))
            .await
            .unwrap();
        let base = spawn_app(pool).await;

        let seen: Value = reqwest::get(format!("{}/transactions/seen-tx", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(seen["data"]["processed"], json!(true));
        assert_eq!(seen["data"]["kind"], json!("token"));

        let unseen: Value = reqwest::get(format!("{}/transactions/other-tx", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(unseen["data"]["processed"], json!(false));
        assert_eq!(unseen["data"]["processed_at"], Value::Null);
    }
}
