use qa_client::{ApiClient, ChatPanel, ClientConfig, PdfFile, RootView, View};
use std::path::PathBuf;

// Usage: cargo run -p qa_client --example ask -- <file.pdf> "<question>"
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let (Some(pdf), Some(question)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: ask <file.pdf> <question>");
    };

    let client = ApiClient::new(ClientConfig::from_env());
    println!("🔍 Backend: {}", client.config().base_url());

    let mut root = RootView::new();
    let file = PdfFile::from_path(&PathBuf::from(pdf)).await?;

    println!("\n📄 Uploading {}", file.file_name);
    let widget = root
        .upload_widget_mut()
        .ok_or_else(|| anyhow::anyhow!("not on the upload view"))?;
    match widget.select_file(&client, Some(file)).await {
        Some(result) => root.on_upload_success(result),
        None => anyhow::bail!(
            "{}",
            widget.error().unwrap_or("upload did not complete")
        ),
    }

    let View::Chat(panel) = root.view_mut() else {
        anyhow::bail!("upload did not switch to chat");
    };
    ask(panel, &client, &question).await;

    for message in panel.transcript() {
        println!("{:?}: {}", message.kind, message.content);
    }

    println!("\n✅ Done!");
    Ok(())
}

async fn ask(panel: &mut ChatPanel, client: &ApiClient, question: &str) {
    panel.insert_str(question);
    panel.submit(client).await;
}
