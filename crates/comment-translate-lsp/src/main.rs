use comment_translate_lsp::server::Backend;
use tower_lsp_server::{LspService, Server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!(
        "starting comment-translate-lsp {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::build(Backend::new)
        .custom_method("lastHover", Backend::last_hover)
        .custom_method("translate", Backend::translate)
        .custom_method(
            "commentTranslate/translateSelection",
            Backend::translate_selection,
        )
        .custom_method("commentTranslate/recentLanguages", Backend::recent_languages)
        .finish();

    Server::new(stdin, stdout, socket).serve(service).await;
}
