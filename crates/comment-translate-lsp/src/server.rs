use crate::config::{SETTINGS_SECTION, ServerConfig, settings_patch_from_value};
use crate::document::{DocumentState, ServerState, build_translator};
use crate::handlers::{hover, selection, translate};
use crate::protocol::{
    LastHoverParams, TranslateParams, TranslateSelectionParams, TranslateSelectionResult,
};
use comment_translate_core::{CoreError, SettingsPatch};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tower_lsp_server::jsonrpc::{self, Result};
use tower_lsp_server::ls_types::{
    ConfigurationItem, DidChangeConfigurationParams, DidChangeTextDocumentParams,
    DidCloseTextDocumentParams, DidOpenTextDocumentParams, GotoDefinitionParams,
    GotoDefinitionResponse, Hover, HoverParams, HoverProviderCapability, InitializeParams,
    InitializeResult, InitializedParams, MessageType, OneOf, ServerCapabilities, ServerInfo,
    TextDocumentSyncCapability, TextDocumentSyncKind,
};
use tower_lsp_server::{Client, LanguageServer};

pub struct Backend {
    client: Client,
    state: Arc<ServerState>,
    config: Arc<RwLock<ServerConfig>>,
    /// Client answers `workspace/configuration`.
    pull_configuration: AtomicBool,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: Arc::new(ServerState::new()),
            config: Arc::new(RwLock::new(ServerConfig::default())),
            pull_configuration: AtomicBool::new(false),
        }
    }

    fn server_capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
            hover_provider: Some(HoverProviderCapability::Simple(true)),
            definition_provider: Some(OneOf::Left(true)),
            ..Default::default()
        }
    }

    async fn apply_settings(&self, patch: SettingsPatch) {
        let language = {
            let mut config = self.config.write().await;
            config.settings.apply(patch);
            tracing::debug!("settings updated: {:?}", config.settings);
            config.settings.target_language.clone()
        };
        self.state.promote_language(&language);
    }

    /// Queries the client for the current settings section.
    async fn pull_settings(&self) {
        let items = vec![ConfigurationItem {
            scope_uri: None,
            section: Some(SETTINGS_SECTION.to_string()),
        }];

        match self.client.configuration(items).await {
            Ok(values) => {
                if let Some(patch) = values.first().and_then(settings_patch_from_value) {
                    self.apply_settings(patch).await;
                }
            }
            Err(e) => tracing::debug!("workspace/configuration failed: {}", e),
        }
    }

    /// `lastHover`: the most recent hover produced for a document.
    pub async fn last_hover(&self, params: LastHoverParams) -> Result<Option<Hover>> {
        Ok(self
            .state
            .last_hovers
            .get(&params.uri)
            .map(|hover| hover.clone()))
    }

    /// `translate`: translates free text, `None` on failure.
    pub async fn translate(&self, params: TranslateParams) -> Result<Option<String>> {
        let settings = self.config.read().await.settings.clone();
        match translate::handle_translate(&self.state, &params.text, &settings).await {
            Ok(translated) => Ok(Some(translated)),
            Err(e) => {
                tracing::warn!("translate request failed: {}", e);
                Ok(None)
            }
        }
    }

    /// `commentTranslate/translateSelection`.
    pub async fn translate_selection(
        &self,
        params: TranslateSelectionParams,
    ) -> Result<TranslateSelectionResult> {
        let settings = self.config.read().await.settings.clone();
        translate::handle_translate_selection(&self.state, params, &settings)
            .await
            .map_err(translation_error)
    }

    /// `commentTranslate/recentLanguages`.
    pub async fn recent_languages(&self) -> Result<Vec<String>> {
        Ok(self.state.recent_languages())
    }
}

fn translation_error(error: CoreError) -> jsonrpc::Error {
    let mut err = jsonrpc::Error::internal_error();
    err.message = format!("translation failed: {error}").into();
    err
}

impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        tracing::info!("initializing comment-translate-lsp server");

        if let Some(init_options) = params.initialization_options {
            match serde_json::from_value::<ServerConfig>(init_options) {
                Ok(config) => {
                    tracing::debug!("loaded configuration: {:?}", config);
                    *self.config.write().await = config;
                }
                Err(e) => tracing::warn!("invalid initialization options: {}", e),
            }
        }

        let supports_pull = params
            .capabilities
            .workspace
            .as_ref()
            .and_then(|workspace| workspace.configuration)
            .unwrap_or(false);
        self.pull_configuration.store(supports_pull, Ordering::Relaxed);

        {
            let config = self.config.read().await;
            self.state.set_translator(build_translator(&config.translator));
            self.state.promote_language(&config.settings.target_language);
        }

        Ok(InitializeResult {
            capabilities: Self::server_capabilities(),
            server_info: Some(ServerInfo {
                name: "comment-translate-lsp".into(),
                version: Some(env!("CARGO_PKG_VERSION").into()),
            }),
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        tracing::info!("comment-translate-lsp server initialized");

        self.state.selections.spawn_sweeper();

        let state = Arc::clone(&self.state);
        tokio::task::spawn_blocking(move || {
            state.grammars.syntax_set();
        });

        if self.pull_configuration.load(Ordering::Relaxed) {
            self.pull_settings().await;
        }

        self.client
            .log_message(MessageType::INFO, "comment-translate-lsp ready")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("shutting down comment-translate-lsp server");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        tracing::info!("document opened: {:?} ({})", doc.uri, doc.language_id);

        self.state.update_document(
            doc.uri,
            DocumentState::new(doc.language_id, doc.text, doc.version),
        );
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;

        // Full sync: the last change carries the whole document.
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };
        let Some(language_id) = self
            .state
            .get_document(&uri)
            .map(|doc| doc.language_id.clone())
        else {
            tracing::warn!("change for unknown document: {:?}", uri);
            return;
        };

        self.state.update_document(
            uri,
            DocumentState::new(language_id, change.text, params.text_document.version),
        );
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::info!("document closed: {:?}", uri);
        self.state.remove_document(&uri);
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        if self.pull_configuration.load(Ordering::Relaxed) {
            self.pull_settings().await;
        } else if let Some(patch) = settings_patch_from_value(&params.settings) {
            self.apply_settings(patch).await;
        }
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let settings = self.config.read().await.settings.clone();
        Ok(hover::handle_hover(Arc::clone(&self.state), params, &settings, &self.client).await)
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        selection::handle_definition(&self.state, &params);
        Ok(None)
    }
}
