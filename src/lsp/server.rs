//! Catalog language server
//!
//! Serves inlay hints, hover and go-to-definition for `catalog:` references in
//! `package.json` files over stdio, using tower-lsp.

use super::hover::get_hover;
use super::inlay_hints::get_inlay_hints;
use super::navigation::get_definition;
use crate::config::ResolverConfig;
use crate::document::DocumentManager;
use crate::manifest::is_manifest_uri;
use crate::refresh::RefreshSink;
use crate::resolver::CatalogResolver;
use lsp_types::*;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tower_lsp::jsonrpc::Result;
use tower_lsp::{Client, LanguageServer, LspService, Server};

/// Forwards refresh signals to the client as `workspace/inlayHint/refresh`
struct ClientRefresh(Client);

#[async_trait::async_trait]
impl RefreshSink for ClientRefresh {
    async fn refresh(&self) {
        if let Err(err) = self.0.inlay_hint_refresh().await {
            log::warn!("Inlay hint refresh failed: {}", err);
        }
    }
}

/// The catalog language server
pub struct CatalogLanguageServer {
    /// LSP client connection
    client: Client,
    /// Documents open in the editor
    documents: Arc<DocumentManager>,
    /// Replaced once `initialize` delivers the client's options
    resolver: RwLock<Arc<CatalogResolver>>,
    /// Current workspace folders, in client order
    folders: Mutex<Vec<Url>>,
}

impl CatalogLanguageServer {
    /// Create a new language server
    pub fn new(client: Client, config: ResolverConfig) -> Self {
        let documents = Arc::new(DocumentManager::new());
        let resolver = Self::build_resolver(&client, &documents, config);

        Self {
            client,
            documents,
            resolver: RwLock::new(resolver),
            folders: Mutex::new(Vec::new()),
        }
    }

    fn build_resolver(
        client: &Client,
        documents: &Arc<DocumentManager>,
        config: ResolverConfig,
    ) -> Arc<CatalogResolver> {
        let resolver = CatalogResolver::new(documents.clone(), config)
            .with_refresh_sink(Arc::new(ClientRefresh(client.clone())));
        Arc::new(resolver)
    }

    fn resolver(&self) -> Arc<CatalogResolver> {
        Arc::clone(&self.resolver.read())
    }

    /// Text of an open manifest, or `None` for any other document
    fn manifest_text(&self, uri: &Url) -> Option<String> {
        let resolver = self.resolver();
        if !is_manifest_uri(uri, &resolver.config().manifest_file) {
            return None;
        }
        self.documents.get(uri).map(|doc| doc.text)
    }

    fn server_capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(
                TextDocumentSyncKind::INCREMENTAL,
            )),
            hover_provider: Some(HoverProviderCapability::Simple(true)),
            definition_provider: Some(OneOf::Left(true)),
            inlay_hint_provider: Some(OneOf::Left(true)),
            workspace: Some(WorkspaceServerCapabilities {
                workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                    supported: Some(true),
                    change_notifications: Some(OneOf::Left(true)),
                }),
                file_operations: None,
            }),
            ..Default::default()
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for CatalogLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if params.initialization_options.is_some() {
            let config = ResolverConfig::from_json(params.initialization_options);
            *self.resolver.write() = Self::build_resolver(&self.client, &self.documents, config);
        }

        if let Some(folders) = params.workspace_folders {
            let folders: Vec<Url> = folders.into_iter().map(|f| f.uri).collect();
            self.resolver().set_workspace_folders(&folders);
            *self.folders.lock() = folders;
        }

        Ok(InitializeResult {
            capabilities: Self::server_capabilities(),
            server_info: Some(ServerInfo {
                name: "catalog-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        log::info!("Catalog language server initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        self.resolver().dispose();
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        self.documents.open(doc.uri, doc.text, doc.version);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents
            .apply_changes(&uri, params.content_changes, params.text_document.version);
        self.resolver().on_descriptor_changed(&uri);
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.documents.close(&params.text_document.uri);
    }

    async fn did_change_workspace_folders(&self, params: DidChangeWorkspaceFoldersParams) {
        let folders = {
            let mut folders = self.folders.lock();
            folders.retain(|uri| !params.event.removed.iter().any(|f| &f.uri == uri));
            folders.extend(params.event.added.into_iter().map(|f| f.uri));
            folders.clone()
        };
        self.resolver().set_workspace_folders(&folders);
    }

    async fn inlay_hint(&self, params: InlayHintParams) -> Result<Option<Vec<InlayHint>>> {
        let uri = params.text_document.uri;
        let Some(text) = self.manifest_text(&uri) else {
            return Ok(None);
        };

        let hints = get_inlay_hints(&self.resolver(), &uri, &text).await;
        Ok(Some(hints))
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let position = params.text_document_position_params;
        let Some(text) = self.manifest_text(&position.text_document.uri) else {
            return Ok(None);
        };

        Ok(get_hover(
            &self.resolver(),
            &position.text_document.uri,
            &text,
            position.position,
        )
        .await)
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let position = params.text_document_position_params;
        let Some(text) = self.manifest_text(&position.text_document.uri) else {
            return Ok(None);
        };

        let location = get_definition(
            &self.resolver(),
            &position.text_document.uri,
            &text,
            position.position,
        )
        .await;
        Ok(location.map(GotoDefinitionResponse::Scalar))
    }
}

/// Serve the language server over stdio until the client exits
pub async fn start_server(config: ResolverConfig) {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) =
        LspService::build(|client| CatalogLanguageServer::new(client, config)).finish();

    Server::new(stdin, stdout, socket).serve(service).await;
}
