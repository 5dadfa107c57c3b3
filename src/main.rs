use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    blog_search::run().await
}
