pub mod progress;

use crate::{
    api::LogoApi,
    error::{LogoError, Result},
    models::{
        DownloadOutcome, DownloadRequest, DownloadSize, GenerationRequest, GenerationResult,
        HistoryEntry, ImprovedPrompt, LogoForm,
    },
    storage::HistoryStore,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::sync::Arc;

pub use progress::{LoadingProgress, LoadingSchedule, LoadingStage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingKind {
    Preview,
    Generate,
    Improve,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationState {
    Idle,
    Loading(LoadingKind),
    PromptProposed(ImprovedPrompt),
    Result {
        urls: Vec<String>,
        generation_id: String,
        preview: bool,
        selected: usize,
    },
    Error(String),
}

impl GenerationState {
    pub fn is_loading(&self) -> bool {
        matches!(self, GenerationState::Loading(_))
    }
}

/// Handle for one in-flight call.
///
/// Every flow gets a fresh epoch, and a completion is applied only while its
/// epoch is current and the orchestrator is still loading for it. A response
/// arriving after [`GenerationOrchestrator::reset`], or a second completion
/// for the same call, is dropped.
#[derive(Debug)]
pub struct Ticket {
    epoch: u64,
    kind: LoadingKind,
    request: GenerationRequest,
}

impl Ticket {
    pub fn kind(&self) -> LoadingKind {
        self.kind
    }

    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

pub struct GenerationOrchestrator {
    api: Arc<dyn LogoApi>,
    history: HistoryStore,
    state: GenerationState,
    epoch: u64,
    proposal_base: Option<GenerationRequest>,
    progress: Option<LoadingProgress>,
}

impl GenerationOrchestrator {
    pub fn new(api: Arc<dyn LogoApi>, history: HistoryStore) -> Self {
        Self {
            api,
            history,
            state: GenerationState::Idle,
            epoch: 0,
            proposal_base: None,
            progress: None,
        }
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn loading_progress(&self) -> Option<LoadingStage> {
        match self.state {
            GenerationState::Loading(_) => self.progress.map(|p| p.stage()),
            _ => None,
        }
    }

    fn ensure_can_start(&self) -> Result<()> {
        match self.state {
            GenerationState::Loading(_) => Err(LogoError::Validation(
                "A request is already in progress".into(),
            )),
            GenerationState::PromptProposed(_) => Err(LogoError::Validation(
                "Accept or decline the improved prompt first".into(),
            )),
            _ => Ok(()),
        }
    }

    fn enter_loading(&mut self, kind: LoadingKind, request: GenerationRequest) -> Ticket {
        self.epoch += 1;
        self.state = GenerationState::Loading(kind);
        self.progress = Some(LoadingProgress::start(kind));
        Ticket {
            epoch: self.epoch,
            kind,
            request,
        }
    }

    fn is_current(&self, ticket: &Ticket) -> bool {
        if ticket.epoch != self.epoch {
            log::debug!(
                "Dropping stale {:?} completion (epoch {} != {})",
                ticket.kind,
                ticket.epoch,
                self.epoch
            );
            return false;
        }
        if self.state != GenerationState::Loading(ticket.kind) {
            log::debug!(
                "Dropping {:?} completion, no longer loading ({:?})",
                ticket.kind,
                self.state
            );
            return false;
        }
        true
    }

    fn fail(&mut self, message: String) {
        log::warn!("Generation flow failed: {}", message);
        self.progress = None;
        self.state = GenerationState::Error(message);
    }

    /// Validate the form and move to `Loading`. Nothing changes when the
    /// form is invalid.
    pub fn begin_submit(&mut self, form: &LogoForm) -> Result<Ticket> {
        let request = form.build()?;
        self.ensure_can_start()?;

        let kind = if request.preview_mode {
            LoadingKind::Preview
        } else {
            LoadingKind::Generate
        };
        Ok(self.enter_loading(kind, request))
    }

    /// Apply a generation response. Returns `false` if the ticket was stale.
    pub fn complete_submit(&mut self, ticket: Ticket, outcome: Result<GenerationResult>) -> bool {
        if !self.is_current(&ticket) {
            return false;
        }

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                self.fail(e.user_message());
                return true;
            }
        };

        if let Some(message) = result.error_message.clone() {
            self.fail(message);
            return true;
        }
        if result.urls.is_empty() {
            self.fail(crate::models::NO_LOGO_RETURNED.to_string());
            return true;
        }

        if !result.preview {
            self.record_history(&ticket.request, &result);
        }

        self.progress = None;
        self.state = GenerationState::Result {
            urls: result.urls,
            generation_id: result.generation_id,
            preview: result.preview,
            selected: 0,
        };
        true
    }

    fn record_history(&mut self, request: &GenerationRequest, result: &GenerationResult) {
        let Some(url) = result.first_url() else {
            return;
        };
        let entry = HistoryEntry::new(url, request.business_name.clone(), request.style.as_str());
        if let Err(e) = self.history.append(entry) {
            log::warn!("Failed to persist logo history: {}", e);
        }
    }

    pub async fn submit(&mut self, form: &LogoForm) -> Result<&GenerationState> {
        let ticket = self.begin_submit(form)?;
        let outcome = self.api.submit_generation(ticket.request()).await;
        self.complete_submit(ticket, outcome);
        Ok(&self.state)
    }

    pub fn begin_improve(&mut self, form: &LogoForm) -> Result<Ticket> {
        let request = form.build()?;
        self.ensure_can_start()?;
        Ok(self.enter_loading(LoadingKind::Improve, request))
    }

    pub fn complete_improve(&mut self, ticket: Ticket, outcome: Result<ImprovedPrompt>) -> bool {
        if !self.is_current(&ticket) {
            return false;
        }

        match outcome {
            Ok(improved) => {
                log::info!("Improved prompt proposed ({} chars)", improved.text.len());
                self.progress = None;
                self.proposal_base = Some(ticket.request);
                self.state = GenerationState::PromptProposed(improved);
            }
            Err(e) => self.fail(e.user_message()),
        }
        true
    }

    pub async fn improve(&mut self, form: &LogoForm) -> Result<&GenerationState> {
        let ticket = self.begin_improve(form)?;
        let outcome = self.api.improve_prompt(ticket.request()).await;
        self.complete_improve(ticket, outcome);
        Ok(&self.state)
    }

    /// Start a full generation that uses the improved text as description.
    pub fn begin_accept(&mut self) -> Result<Ticket> {
        let improved = match &self.state {
            GenerationState::PromptProposed(improved) => improved.text.clone(),
            _ => {
                return Err(LogoError::Validation(
                    "There is no improved prompt to accept".into(),
                ))
            }
        };
        let base = self
            .proposal_base
            .take()
            .ok_or_else(|| LogoError::Validation("There is no improved prompt to accept".into()))?;

        let request = base.with_description(improved).as_full();
        Ok(self.enter_loading(LoadingKind::Generate, request))
    }

    pub async fn accept(&mut self) -> Result<&GenerationState> {
        let ticket = self.begin_accept()?;
        let outcome = self.api.submit_generation(ticket.request()).await;
        self.complete_submit(ticket, outcome);
        Ok(&self.state)
    }

    /// Drop the proposal and its preview, back to `Idle`.
    pub fn decline(&mut self) -> Result<()> {
        if !matches!(self.state, GenerationState::PromptProposed(_)) {
            return Err(LogoError::Validation(
                "There is no improved prompt to decline".into(),
            ));
        }
        self.proposal_base = None;
        self.state = GenerationState::Idle;
        Ok(())
    }

    /// Back to `Idle` from anywhere. In-flight calls become stale.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.proposal_base = None;
        self.progress = None;
        self.state = GenerationState::Idle;
    }

    pub fn select_variation(&mut self, index: usize) -> Result<()> {
        match &mut self.state {
            GenerationState::Result { urls, selected, .. } if index < urls.len() => {
                *selected = index;
                Ok(())
            }
            GenerationState::Result { urls, .. } => Err(LogoError::Validation(format!(
                "Variation {} does not exist ({} available)",
                index.saturating_add(1),
                urls.len()
            ))),
            _ => Err(LogoError::Validation("No logo has been generated".into())),
        }
    }

    pub fn selected_url(&self) -> Option<&str> {
        match &self.state {
            GenerationState::Result { urls, selected, .. } => urls.get(*selected).map(String::as_str),
            _ => None,
        }
    }

    /// Resize the selected logo server-side. When that fails the caller
    /// gets the image location to open directly.
    pub async fn download_selected(
        &self,
        size: DownloadSize,
        transparent: bool,
    ) -> Result<DownloadOutcome> {
        let url = self
            .selected_url()
            .ok_or_else(|| LogoError::Validation("No logo to download".into()))?
            .to_string();

        match self.download_url(&url, size, transparent).await {
            Ok(bytes) => Ok(DownloadOutcome::Saved {
                bytes,
                file_name: size.file_name(),
            }),
            Err(e) => {
                log::warn!("Download failed, falling back to direct open: {}", e);
                Ok(DownloadOutcome::OpenDirect(url))
            }
        }
    }

    async fn download_url(&self, url: &str, size: DownloadSize, transparent: bool) -> Result<Vec<u8>> {
        let image_base64 = match inline_base64(url) {
            Some(payload) => payload.to_string(),
            None => STANDARD.encode(self.api.fetch_image(url).await?),
        };
        let request = DownloadRequest {
            image_base64,
            size,
            transparent,
        };
        self.api.download(&request).await
    }
}

/// Payload of a `data:<mime>;base64,` location, if it is one.
fn inline_base64(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    header.ends_with(";base64").then_some(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LogoSize, LogoStyle};
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedApi {
        generations: Mutex<VecDeque<Result<GenerationResult>>>,
        improvements: Mutex<VecDeque<Result<ImprovedPrompt>>>,
        downloads: Mutex<VecDeque<Result<Vec<u8>>>>,
        sent: Mutex<Vec<GenerationRequest>>,
        downloads_sent: Mutex<Vec<DownloadRequest>>,
        calls: AtomicUsize,
    }

    impl ScriptedApi {
        fn generating(self, result: Result<GenerationResult>) -> Self {
            self.generations.lock().unwrap().push_back(result);
            self
        }

        fn improving(self, result: Result<ImprovedPrompt>) -> Self {
            self.improvements.lock().unwrap().push_back(result);
            self
        }

        fn downloading(self, result: Result<Vec<u8>>) -> Self {
            self.downloads.lock().unwrap().push_back(result);
            self
        }
    }

    #[async_trait]
    impl LogoApi for ScriptedApi {
        async fn submit_generation(&self, request: &GenerationRequest) -> Result<GenerationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sent.lock().unwrap().push(request.clone());
            self.generations.lock().unwrap().pop_front().expect("unscripted generation")
        }

        async fn improve_prompt(&self, request: &GenerationRequest) -> Result<ImprovedPrompt> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sent.lock().unwrap().push(request.clone());
            self.improvements.lock().unwrap().pop_front().expect("unscripted improvement")
        }

        async fn check_health(&self) -> bool {
            true
        }

        async fn fetch_image(&self, _url: &str) -> Result<Vec<u8>> {
            Ok(b"png".to_vec())
        }

        async fn download(&self, request: &DownloadRequest) -> Result<Vec<u8>> {
            self.downloads_sent.lock().unwrap().push(request.clone());
            self.downloads.lock().unwrap().pop_front().expect("unscripted download")
        }
    }

    fn ok(urls: &[&str], preview: bool) -> Result<GenerationResult> {
        Ok(GenerationResult {
            urls: urls.iter().map(|u| u.to_string()).collect(),
            generation_id: "gen-1".into(),
            error_message: None,
            preview,
        })
    }

    fn orchestrator(api: ScriptedApi) -> (GenerationOrchestrator, Arc<ScriptedApi>) {
        let api = Arc::new(api);
        let history = HistoryStore::open(Arc::new(MemoryStore::new()));
        (GenerationOrchestrator::new(api.clone(), history), api)
    }

    fn form() -> LogoForm {
        LogoForm::new("Acme").with_style(LogoStyle::Vintage)
    }

    #[tokio::test]
    async fn empty_name_never_reaches_the_network() {
        let (mut orch, api) = orchestrator(ScriptedApi::default());
        let err = orch.submit(&LogoForm::new("")).await.unwrap_err();
        assert!(matches!(err, LogoError::Validation(_)));
        assert_eq!(*orch.state(), GenerationState::Idle);
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn full_generation_lands_in_result_and_history() {
        let (mut orch, _) = orchestrator(ScriptedApi::default().generating(ok(&["a", "b"], false)));
        orch.submit(&form()).await.unwrap();

        match orch.state() {
            GenerationState::Result { urls, preview, .. } => {
                assert_eq!(urls, &vec!["a".to_string(), "b".to_string()]);
                assert!(!preview);
            }
            other => panic!("unexpected state {:?}", other),
        }
        assert_eq!(orch.history().len(), 1);
        let entry = &orch.history().entries()[0];
        assert_eq!(entry.url, "a");
        assert_eq!(entry.business_name, "Acme");
        assert_eq!(entry.style, "vintage");
    }

    #[tokio::test]
    async fn preview_is_not_recorded() {
        let (mut orch, api) = orchestrator(ScriptedApi::default().generating(ok(&["p"], true)));
        orch.submit(&form().with_size(LogoSize::Portrait).preview(true))
            .await
            .unwrap();

        assert!(matches!(orch.state(), GenerationState::Result { preview: true, .. }));
        assert!(orch.history().is_empty());
        assert_eq!(api.sent.lock().unwrap()[0].size, None);
    }

    #[tokio::test]
    async fn transport_failure_becomes_error_state() {
        let (mut orch, _) = orchestrator(
            ScriptedApi::default().generating(Err(LogoError::RequestFailed("X".into()))),
        );
        orch.submit(&form()).await.unwrap();
        assert_eq!(*orch.state(), GenerationState::Error("X".into()));
        assert!(orch.history().is_empty());

        orch.reset();
        assert_eq!(*orch.state(), GenerationState::Idle);
    }

    #[tokio::test]
    async fn reported_failure_becomes_error_state() {
        let failed = GenerationResult::failed("g", "Content policy", false);
        let (mut orch, _) = orchestrator(ScriptedApi::default().generating(Ok(failed)));
        orch.submit(&form()).await.unwrap();
        assert_eq!(*orch.state(), GenerationState::Error("Content policy".into()));
    }

    #[tokio::test]
    async fn accepting_uses_the_improved_text() {
        let improved = ImprovedPrompt {
            text: "A vintage badge with a fox".into(),
            preview_url: Some("https://cdn.test/p.png".into()),
        };
        let (mut orch, api) = orchestrator(
            ScriptedApi::default()
                .improving(Ok(improved.clone()))
                .generating(ok(&["final"], false)),
        );

        orch.improve(&form().with_description("fox")).await.unwrap();
        assert_eq!(*orch.state(), GenerationState::PromptProposed(improved));

        orch.accept().await.unwrap();
        assert_eq!(orch.selected_url(), Some("final"));

        let sent = api.sent.lock().unwrap();
        assert_eq!(sent[1].description.as_deref(), Some("A vintage badge with a fox"));
        assert!(!sent[1].preview_mode);
    }

    #[tokio::test]
    async fn declining_discards_the_proposal() {
        let improved = ImprovedPrompt {
            text: "better".into(),
            preview_url: Some("p".into()),
        };
        let (mut orch, _) = orchestrator(ScriptedApi::default().improving(Ok(improved)));
        orch.improve(&form()).await.unwrap();

        orch.decline().unwrap();
        assert_eq!(*orch.state(), GenerationState::Idle);
        assert!(orch.begin_accept().is_err());
        assert!(orch.decline().is_err());
    }

    #[tokio::test]
    async fn failed_improvement_is_an_error() {
        let (mut orch, _) = orchestrator(
            ScriptedApi::default().improving(Err(LogoError::RequestFailed("Failed to improve prompt".into()))),
        );
        orch.improve(&form()).await.unwrap();
        assert_eq!(
            *orch.state(),
            GenerationState::Error("Failed to improve prompt".into())
        );
    }

    #[test]
    fn late_completion_after_reset_is_dropped() {
        let (mut orch, _) = orchestrator(ScriptedApi::default());
        let ticket = orch.begin_submit(&form()).unwrap();
        assert_eq!(*orch.state(), GenerationState::Loading(LoadingKind::Generate));
        assert_eq!(orch.loading_progress(), Some(LoadingStage::Analyzing));

        orch.reset();
        assert!(!orch.complete_submit(ticket, ok(&["late"], false)));
        assert_eq!(*orch.state(), GenerationState::Idle);
        assert!(orch.history().is_empty());
        assert_eq!(orch.loading_progress(), None);
    }

    #[test]
    fn completion_is_applied_once() {
        let (mut orch, _) = orchestrator(ScriptedApi::default());
        let ticket = orch.begin_submit(&form()).unwrap();
        let duplicate = Ticket {
            epoch: ticket.epoch,
            kind: ticket.kind,
            request: ticket.request.clone(),
        };

        assert!(orch.complete_submit(ticket, ok(&["first"], false)));
        assert!(!orch.complete_submit(duplicate, ok(&["second"], false)));
        assert_eq!(orch.selected_url(), Some("first"));
        assert_eq!(orch.history().len(), 1);
    }

    #[test]
    fn ticket_from_an_earlier_flow_is_stale() {
        let (mut orch, _) = orchestrator(ScriptedApi::default());
        let first = orch.begin_submit(&form()).unwrap();
        let earlier = Ticket {
            epoch: first.epoch,
            kind: first.kind,
            request: first.request.clone(),
        };
        assert!(orch.complete_submit(first, ok(&["a"], false)));

        let second = orch.begin_submit(&form()).unwrap();
        assert!(!orch.complete_submit(earlier, ok(&["old"], false)));
        assert_eq!(*orch.state(), GenerationState::Loading(LoadingKind::Generate));

        assert!(orch.complete_submit(second, ok(&["b"], false)));
        assert_eq!(orch.selected_url(), Some("b"));
        assert_eq!(orch.history().len(), 2);
    }

    #[test]
    fn improvement_ticket_cannot_complete_a_generation() {
        let (mut orch, _) = orchestrator(ScriptedApi::default());
        let ticket = orch.begin_improve(&form()).unwrap();
        let mislabeled = Ticket {
            epoch: ticket.epoch,
            kind: LoadingKind::Generate,
            request: ticket.request.clone(),
        };
        assert!(!orch.complete_submit(mislabeled, ok(&["x"], false)));
        assert_eq!(*orch.state(), GenerationState::Loading(LoadingKind::Improve));
    }

    #[test]
    fn cannot_start_while_loading() {
        let (mut orch, _) = orchestrator(ScriptedApi::default());
        let _ticket = orch.begin_submit(&form()).unwrap();
        assert!(orch.begin_improve(&form()).is_err());
    }

    #[tokio::test]
    async fn variations_are_selectable() {
        let (mut orch, _) = orchestrator(ScriptedApi::default().generating(ok(&["a", "b", "c"], false)));
        orch.submit(&form()).await.unwrap();

        assert_eq!(orch.selected_url(), Some("a"));
        orch.select_variation(2).unwrap();
        assert_eq!(orch.selected_url(), Some("c"));
        assert!(orch.select_variation(3).is_err());
        assert_eq!(orch.selected_url(), Some("c"));

        let err = orch.select_variation(usize::MAX).unwrap_err();
        assert!(err.to_string().contains("3 available"));
        assert_eq!(orch.selected_url(), Some("c"));
    }

    #[tokio::test]
    async fn download_sends_encoded_image() {
        let (mut orch, api) = orchestrator(
            ScriptedApi::default()
                .generating(ok(&["https://cdn.test/a.png"], false))
                .downloading(Ok(b"resized".to_vec())),
        );
        orch.submit(&form()).await.unwrap();

        let outcome = orch.download_selected(DownloadSize::Small, true).await.unwrap();
        assert_eq!(
            outcome,
            DownloadOutcome::Saved {
                bytes: b"resized".to_vec(),
                file_name: "logo_256px.png".into()
            }
        );
        let sent = api.downloads_sent.lock().unwrap();
        assert_eq!(sent[0].image_base64, STANDARD.encode(b"png"));
        assert!(sent[0].transparent);
    }

    #[tokio::test]
    async fn failed_download_falls_back_to_direct_open() {
        let url = "data:image/png;base64,aGVsbG8=";
        let (mut orch, api) = orchestrator(
            ScriptedApi::default()
                .generating(ok(&[url], false))
                .downloading(Err(LogoError::DownloadFailed("boom".into()))),
        );
        orch.submit(&form()).await.unwrap();

        let outcome = orch.download_selected(DownloadSize::Medium, false).await.unwrap();
        assert_eq!(outcome, DownloadOutcome::OpenDirect(url.to_string()));
        assert_eq!(api.downloads_sent.lock().unwrap()[0].image_base64, "aGVsbG8=");
    }

    #[test]
    fn inline_payloads() {
        assert_eq!(inline_base64("data:image/png;base64,QUJD"), Some("QUJD"));
        assert_eq!(inline_base64("data:text/plain,hi"), None);
        assert_eq!(inline_base64("https://cdn.test/a.png"), None);
    }
}
