use crate::common::run_app_test;

#[tokio::test]
async fn smoke_test() {
    run_app_test(|app| async move {
        let response = app.get("/health", None).send().await?;

        assert_eq!(
            response.status().as_u16(),
            200,
            "response status code should be 200"
        );

        let body = response.json::<serde_json::Value>().await?;
        assert_eq!(body["healthy"], true);
        Ok(())
    })
    .await
}
