pub async fn index() -> &'static str {
    "Alive"
}
