use super::path::{self, ParsedPath};
use super::reply::Reply;
use super::risk::{self, RiskAssessment};
use super::transitions::{self, Choice, Node};
use crate::hotlines::{HotlineDirectory, MAX_HOTLINES};
use crate::i18n::{Language, Localizer, Prompt};
use crate::store::{SessionField, SessionRecord, SessionStore, StoreError};
use serde::Deserialize;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

/// Terminal text of the hotline branch. The rendered list is logged and
/// replaced by this message.
pub const HOTLINE_FAREWELL: &str = "Thank you. Keep safe";

/// Recommendations shown with a risk result.
const MAX_RECOMMENDATIONS: usize = 3;

/// One gateway callback.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UssdRequest {
    pub session_id: String,
    pub phone_number: String,
    pub network_code: String,
    pub service_code: String,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("{context}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },
    #[error("failed to get hotlines")]
    Hotlines(#[source] anyhow::Error),
    #[error("request timed out")]
    Deadline(Duration),
}

impl DialogError {
    fn store(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { context, source }
    }
}

/// Drives one request through the screening dialog.
///
/// The engine keeps no per-session state of its own: the node comes from
/// the path string and everything else lives in the session store.
pub struct DialogEngine {
    store: Arc<dyn SessionStore>,
    localizer: Arc<dyn Localizer>,
    hotlines: Arc<dyn HotlineDirectory>,
    session_ttl: Option<Duration>,
    request_deadline: Option<Duration>,
}

impl DialogEngine {
    pub fn new(
        store: Arc<dyn SessionStore>,
        localizer: Arc<dyn Localizer>,
        hotlines: Arc<dyn HotlineDirectory>,
    ) -> Self {
        Self {
            store,
            localizer,
            hotlines,
            session_ttl: None,
            request_deadline: None,
        }
    }

    /// Expire new sessions after `ttl`.
    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Abandon any request still running after `deadline`.
    #[must_use]
    pub fn with_request_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.request_deadline = deadline;
        self
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Handle a request; on failure or an elapsed request deadline the
    /// session is deleted so the caller restarts from the welcome menu.
    pub async fn respond(&self, request: &UssdRequest) -> Result<Reply, DialogError> {
        let outcome = match self.request_deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.handle(request))
                .await
                .unwrap_or_else(|_| Err(DialogError::Deadline(deadline))),
            None => self.handle(request).await,
        };
        match outcome {
            Ok(reply) => Ok(reply),
            Err(err) => {
                tracing::error!(
                    session_id = %request.session_id,
                    text = %request.text,
                    "dialog failed: {}",
                    describe(&err)
                );
                self.abandon(&request.session_id).await;
                Err(err)
            }
        }
    }

    /// Handle a request without error recovery.
    pub async fn handle(&self, request: &UssdRequest) -> Result<Reply, DialogError> {
        let parsed = path::classify(&request.text);
        tracing::debug!(
            session_id = %request.session_id,
            node = ?parsed.node,
            "classified path {:?}",
            request.text
        );
        let sid = request.session_id.as_str();
        // Every node past `Init` carries the language of its first choice.
        let path_language = parsed.language.unwrap_or(Language::Swahili);

        match parsed.node {
            Node::Init => self.register(request).await,
            Node::LanguageSelect => {
                self.store
                    .set(sid, SessionField::Language, path_language.tag())
                    .await
                    .map_err(DialogError::store("failed to set user language"))?;
                Ok(self.prompt(path_language, Prompt::ServiceMenu))
            }
            Node::HotlineCountyPrompt => Ok(self.prompt(path_language, Prompt::CountyPrompt)),
            Node::HotlineResult => self.hotline_result(&parsed, path_language).await,
            Node::AgeMenu => Ok(self.prompt(path_language, Prompt::AgeMenu)),
            Node::AgeSelect | Node::CasesSelect | Node::ContactSelect => {
                self.single_select(sid, &parsed).await
            }
            Node::HowContactSelect | Node::SymptomsSelect | Node::IllnessSelect => {
                self.multi_select(sid, &parsed).await
            }
            Node::Unrecognized => Ok(Reply::Silent),
        }
    }

    /// Delete the session; failures are logged, never propagated.
    pub async fn abandon(&self, session_id: &str) {
        if let Err(e) = self.store.delete(session_id).await {
            tracing::warn!(session_id, "failed to delete session after error: {e}");
        }
    }

    /// Typed view of the stored session.
    pub async fn session(&self, session_id: &str) -> Result<SessionRecord, StoreError> {
        let fields = self.store.get_all(session_id).await?;
        Ok(SessionRecord::from_fields(&fields))
    }

    async fn register(&self, request: &UssdRequest) -> Result<Reply, DialogError> {
        let sid = request.session_id.as_str();
        self.store
            .set_many(
                sid,
                &[
                    (SessionField::Phone, request.phone_number.as_str()),
                    (SessionField::SessionId, sid),
                ],
            )
            .await
            .map_err(DialogError::store("failed to save user"))?;

        if let Some(ttl) = self.session_ttl {
            self.store
                .expire(sid, ttl)
                .await
                .map_err(DialogError::store("failed to save user"))?;
        }

        Ok(Reply::Continue(
            self.localizer.text(Language::English, Prompt::Welcome),
        ))
    }

    async fn hotline_result(
        &self,
        parsed: &ParsedPath<'_>,
        language: Language,
    ) -> Result<Reply, DialogError> {
        let county = parsed.selections.first().copied().unwrap_or_default();
        let mut hotlines = self
            .hotlines
            .lookup(county)
            .await
            .map_err(DialogError::Hotlines)?;
        hotlines.truncate(MAX_HOTLINES);

        let mut listing = self.localizer.text(language, Prompt::HotlineHeader);
        for (index, number) in hotlines.iter().enumerate() {
            let _ = write!(listing, "\n{}. {number}", index + 1);
        }
        // Callers get the farewell, not the listing.
        tracing::debug!(county, "hotline listing: {listing:?}");

        Ok(Reply::End(HOTLINE_FAREWELL.to_string()))
    }

    async fn single_select(
        &self,
        sid: &str,
        parsed: &ParsedPath<'_>,
    ) -> Result<Reply, DialogError> {
        let node = parsed.node;
        let token = parsed.selections.first().copied().unwrap_or_default();
        let Some(choice) = transitions::lookup(node, token) else {
            tracing::debug!(session_id = sid, "ignoring {} answer {token:?}", node.topic());
            return Ok(Reply::Silent);
        };
        let Some(field) = node.field() else {
            return Ok(Reply::Silent);
        };

        let context = save_context(node);
        self.store
            .set(sid, field, choice.label)
            .await
            .map_err(DialogError::store(context))?;
        self.add_score(sid, choice, context).await?;

        self.continue_after(sid, node).await
    }

    async fn multi_select(
        &self,
        sid: &str,
        parsed: &ParsedPath<'_>,
    ) -> Result<Reply, DialogError> {
        let node = parsed.node;
        let choices: Vec<Choice> = parsed
            .selections
            .iter()
            .filter_map(|token| {
                let choice = transitions::lookup(node, token);
                if choice.is_none() {
                    tracing::debug!(session_id = sid, "skipping {} answer {token:?}", node.topic());
                }
                choice
            })
            .collect();
        if choices.is_empty() {
            return Ok(Reply::Silent);
        }
        let Some(field) = node.field() else {
            return Ok(Reply::Silent);
        };

        let context = save_context(node);
        for choice in &choices {
            self.add_score(sid, *choice, context).await?;
            self.store
                .append(sid, field, choice.label)
                .await
                .map_err(DialogError::store(context))?;
        }

        if node == Node::IllnessSelect {
            return self.risk_result(sid).await;
        }
        self.continue_after(sid, node).await
    }

    async fn add_score(
        &self,
        sid: &str,
        choice: Choice,
        context: &'static str,
    ) -> Result<(), DialogError> {
        self.store
            .increment(sid, SessionField::Risk, choice.score)
            .await
            .map_err(DialogError::store(context))?;
        Ok(())
    }

    async fn continue_after(&self, sid: &str, node: Node) -> Result<Reply, DialogError> {
        let Some(next) = node.next_prompt() else {
            return Ok(Reply::Silent);
        };
        let context = response_context(next);
        let language = self
            .stored_language(sid)
            .await
            .map_err(DialogError::store(context))?;
        Ok(self.prompt(language, next))
    }

    async fn risk_result(&self, sid: &str) -> Result<Reply, DialogError> {
        const CONTEXT: &str = "failed to create risk analysis";
        let language = self
            .stored_language(sid)
            .await
            .map_err(DialogError::store(CONTEXT))?;
        let assessment = risk::assess(self.store.as_ref(), sid)
            .await
            .map_err(DialogError::store(CONTEXT))?;

        tracing::info!(
            session_id = sid,
            score = assessment.score,
            band = %assessment.band,
            "screening completed"
        );
        Ok(Reply::End(self.render_risk(language, assessment)))
    }

    fn render_risk(&self, language: Language, assessment: RiskAssessment) -> String {
        let band = self
            .localizer
            .text(language, Prompt::RiskBand(assessment.band));
        let mut text = self
            .localizer
            .text(language, Prompt::RiskSummary)
            .replace("{band}", &band);
        for (index, item) in self
            .localizer
            .recommendations(language)
            .iter()
            .take(MAX_RECOMMENDATIONS)
            .enumerate()
        {
            let _ = write!(text, "\n{}. {item}", index + 1);
        }
        text.push('\n');
        text.push_str(&self.localizer.text(language, Prompt::RiskClosing));
        text
    }

    async fn stored_language(&self, sid: &str) -> Result<Language, StoreError> {
        let tag = self.store.require(sid, SessionField::Language).await?;
        Ok(Language::from_stored(&tag))
    }

    fn prompt(&self, language: Language, prompt: Prompt) -> Reply {
        Reply::Continue(self.localizer.text(language, prompt))
    }
}

fn save_context(node: Node) -> &'static str {
    match node {
        Node::AgeSelect => "failed to save user age",
        Node::CasesSelect => "failed to save cases",
        Node::ContactSelect => "failed to save contact status",
        Node::HowContactSelect => "failed to save how contact happened",
        Node::SymptomsSelect => "failed to save symptoms selection",
        Node::IllnessSelect => "failed to save illness selection",
        _ => "failed to save answer",
    }
}

fn response_context(prompt: Prompt) -> &'static str {
    match prompt {
        Prompt::CasesMenu => "failed to create response for cases",
        Prompt::ContactMenu => "failed to create response for contact",
        Prompt::HowContactMenu => "failed to create response for how contact happened",
        Prompt::SymptomsMenu => "failed to create response for symptoms",
        Prompt::IllnessMenu => "failed to create response for illness",
        _ => "failed to create response",
    }
}

/// Render an error with its full source chain.
fn describe(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(text, ": {cause}");
        source = cause.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::risk::RiskBand;
    use crate::hotlines::StaticHotlines;
    use crate::i18n::BuiltinCatalog;
    use crate::store::MemorySessionStore;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Memory store whose increments can be switched to fail.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemorySessionStore,
        fail_increments: AtomicBool,
        stall_increments: AtomicBool,
    }

    #[async_trait]
    impl SessionStore for FlakyStore {
        fn name(&self) -> &str {
            "flaky"
        }
        async fn set(&self, s: &str, f: SessionField, v: &str) -> Result<(), StoreError> {
            self.inner.set(s, f, v).await
        }
        async fn set_many(&self, s: &str, f: &[(SessionField, &str)]) -> Result<(), StoreError> {
            self.inner.set_many(s, f).await
        }
        async fn get(&self, s: &str, f: SessionField) -> Result<Option<String>, StoreError> {
            self.inner.get(s, f).await
        }
        async fn get_all(&self, s: &str) -> Result<HashMap<String, String>, StoreError> {
            self.inner.get_all(s).await
        }
        async fn increment(&self, s: &str, f: SessionField, d: i64) -> Result<i64, StoreError> {
            if self.stall_increments.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            if self.fail_increments.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("connection refused".into()));
            }
            self.inner.increment(s, f, d).await
        }
        async fn append(&self, s: &str, f: SessionField, t: &str) -> Result<(), StoreError> {
            self.inner.append(s, f, t).await
        }
        async fn expire(&self, s: &str, ttl: Duration) -> Result<(), StoreError> {
            self.inner.expire(s, ttl).await
        }
        async fn delete(&self, s: &str) -> Result<bool, StoreError> {
            self.inner.delete(s).await
        }
        async fn health_check(&self) -> bool {
            true
        }
    }

    fn engine_with(store: Arc<dyn SessionStore>) -> DialogEngine {
        DialogEngine::new(
            store,
            Arc::new(BuiltinCatalog::new()),
            Arc::new(StaticHotlines::new(
                vec!["0716282395".into(), "07453423".into()],
                HashMap::new(),
            )),
        )
    }

    fn engine() -> DialogEngine {
        engine_with(Arc::new(MemorySessionStore::new()))
    }

    fn request(session_id: &str, text: &str) -> UssdRequest {
        UssdRequest {
            session_id: session_id.into(),
            phone_number: "+254700000001".into(),
            network_code: "63902".into(),
            service_code: "*384*123#".into(),
            text: text.into(),
        }
    }

    async fn send(engine: &DialogEngine, session_id: &str, text: &str) -> Reply {
        engine.respond(&request(session_id, text)).await.unwrap()
    }

    async fn risk_of(engine: &DialogEngine, session_id: &str) -> i64 {
        engine.session(session_id).await.unwrap().risk
    }

    #[tokio::test]
    async fn full_english_screening_ends_high() {
        let engine = engine();

        let reply = send(&engine, "s1", "").await;
        assert!(reply.to_string().starts_with("CON Welcome to KoviApp"));

        let reply = send(&engine, "s1", "1").await;
        assert!(reply.to_string().starts_with("CON Select service"));

        let reply = send(&engine, "s1", "1*1").await;
        assert!(reply.text().contains("How old are you"));

        let steps = [
            ("1*1*2", 1, "Have there been any case"),
            ("1*1*2*1", 3, "Have you been in contact"),
            ("1*1*2*1*1", 6, "How did the contact happen"),
            ("1*1*2*1*1*2", 8, "following symptoms"),
            ("1*1*2*1*1*2*4", 9, "any of the following?"),
        ];
        for (text, risk, prompt) in steps {
            let reply = send(&engine, "s1", text).await;
            assert!(!reply.is_terminal(), "{text} should continue");
            assert!(reply.text().contains(prompt), "{text}: {}", reply.text());
            assert_eq!(risk_of(&engine, "s1").await, risk, "risk after {text}");
        }

        let reply = send(&engine, "s1", "1*1*2*1*1*2*4*5").await;
        assert!(reply.is_terminal());
        let body = reply.to_string();
        assert!(body.starts_with("END You have HIGH risk"), "{body}");
        assert!(body.contains("1. Wear mask"));
        assert!(body.ends_with("See you next time"));

        let record = engine.session("s1").await.unwrap();
        assert_eq!(record.risk, 11);
        assert_eq!(RiskBand::classify(record.risk), RiskBand::High);
        assert_eq!(record.language, Some(Language::English));
        assert_eq!(record.session_id.as_deref(), Some("s1"));
        assert_eq!(record.phone_number.as_deref(), Some("+254700000001"));
        assert_eq!(record.age_bracket.as_deref(), Some("15-25"));
        assert_eq!(record.aerial_cases.as_deref(), Some(">100"));
        assert_eq!(record.contact_with_covid.as_deref(), Some("yes"));
        assert_eq!(record.contact_reasons, vec!["face-to-face"]);
        assert_eq!(record.symptoms, vec!["fever"]);
        assert_eq!(record.illnesses, vec!["tuberculosis"]);
    }

    #[tokio::test]
    async fn completed_sessions_are_kept() {
        let engine = engine();
        let steps = [
            "",
            "2",
            "2*1",
            "2*1*1",
            "2*1*1*3",
            "2*1*1*3*2",
            "2*1*1*3*2*7",
            "2*1*1*3*2*7*5",
        ];
        for text in steps {
            send(&engine, "s2", text).await;
        }
        let reply = send(&engine, "s2", "2*1*1*3*2*7*5*7").await;
        // 1 + 1 + 1 + 0 + 0 + 0 = 3
        assert!(reply.to_string().starts_with("END Una hatari ya CHINI"), "{reply}");
        assert!(reply.text().contains("Vaa barakoa"));
        assert!(!engine.session("s2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn multi_select_applies_each_recognized_token() {
        let engine = engine();
        send(&engine, "s1", "1").await;

        let reply = send(&engine, "s1", "1*1*2*1*1*1,3").await;
        assert!(reply.text().contains("symptoms"));
        let record = engine.session("s1").await.unwrap();
        assert_eq!(record.contact_reasons, vec!["working-together", "travelling-together"]);
        assert_eq!(record.risk, 2);

        let engine = self::engine();
        send(&engine, "s1", "1").await;
        send(&engine, "s1", "1*1*2*1*1*1").await;
        let record = engine.session("s1").await.unwrap();
        assert_eq!(record.contact_reasons, vec!["working-together"]);
        assert_eq!(record.risk, 1);
    }

    #[tokio::test]
    async fn multi_select_skips_unknown_tokens() {
        let engine = engine();
        send(&engine, "s1", "1").await;
        send(&engine, "s1", "1*1*2*1*1*2*9,2,2").await;
        let record = engine.session("s1").await.unwrap();
        // Duplicates are kept.
        assert_eq!(record.symptoms, vec!["cough", "cough"]);
        assert_eq!(record.risk, 2);
    }

    #[tokio::test]
    async fn unrecognized_token_changes_nothing() {
        let engine = engine();
        send(&engine, "s1", "").await;
        send(&engine, "s1", "1").await;
        let before = engine.session("s1").await.unwrap();

        let unknown = [
            "1*1*9",
            "1*1*2*9",
            "1*1*2*1*9",
            "1*1*2*1*1*9",
            "1*1*2*1*1*2*9",
            "1*1*2*1*1*2*4*9",
        ];
        for text in unknown {
            let reply = send(&engine, "s1", text).await;
            assert_eq!(reply, Reply::Silent, "{text}");
            assert_eq!(reply.to_string(), "");
        }
        assert_eq!(engine.session("s1").await.unwrap(), before);
    }

    #[tokio::test]
    async fn unrecognized_path_is_silent() {
        let engine = engine();
        assert_eq!(send(&engine, "s1", "7*7").await, Reply::Silent);
        assert!(engine.session("s1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn language_selection_is_idempotent() {
        let engine = engine();
        send(&engine, "s1", "").await;
        send(&engine, "s1", "1").await;
        let reply = send(&engine, "s1", "1").await;
        assert!(reply.text().contains("Select service"));
        assert_eq!(
            engine.session("s1").await.unwrap().language,
            Some(Language::English)
        );
    }

    #[tokio::test]
    async fn risk_never_decreases() {
        let engine = engine();
        let path = [
            "",
            "1",
            "1*1",
            "1*1*5",
            "1*1*5*3",
            "1*1*5*3*2",
            "1*1*5*3*2*7",
            "1*1*5*3*2*7*1,2,3",
            "1*1*5*3*2*7*1,2,3*1",
        ];
        let mut last = 0;
        for text in path {
            send(&engine, "s9", text).await;
            let risk = risk_of(&engine, "s9").await;
            assert!(risk >= last, "risk dropped at {text}");
            last = risk;
        }
        // 3 + 1 + 1 + 0 + 3 + 1
        assert_eq!(last, 9);
    }

    #[tokio::test]
    async fn hotline_branch_ends_with_farewell() {
        let engine = engine();
        let reply = send(&engine, "h1", "2*2").await;
        assert_eq!(reply, Reply::Continue("Andika jina la kaunti".into()));

        let reply = send(&engine, "h1", "1*2*Nairobi").await;
        assert_eq!(reply.to_string(), "END Thank you. Keep safe");
    }

    #[tokio::test]
    async fn missing_language_fails_and_resets_session() {
        let engine = engine();
        send(&engine, "s1", "").await;
        let err = engine.respond(&request("s1", "1*1*2")).await.unwrap_err();
        assert_eq!(err.to_string(), "failed to create response for cases");
        assert!(matches!(
            err,
            DialogError::Store {
                source: StoreError::MissingField { field: "lang", .. },
                ..
            }
        ));
        assert!(engine.session("s1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_stored_language_renders_swahili() {
        let engine = engine();
        engine
            .store()
            .set("s1", SessionField::Language, "fr")
            .await
            .unwrap();
        let reply = send(&engine, "s1", "1*1*3").await;
        assert!(reply.text().starts_with("Kumekuwa na kesi"));
    }

    #[tokio::test]
    async fn store_failure_mid_flow_deletes_session() {
        let store = Arc::new(FlakyStore::default());
        let engine = engine_with(store.clone());
        send(&engine, "s1", "").await;
        send(&engine, "s1", "1").await;
        send(&engine, "s1", "1*1*2").await;

        store.fail_increments.store(true, Ordering::SeqCst);
        let err = engine.respond(&request("s1", "1*1*2*1")).await.unwrap_err();
        assert_eq!(err.to_string(), "failed to save cases");
        assert!(engine.session("s1").await.unwrap().is_empty());

        store.fail_increments.store(false, Ordering::SeqCst);
        let reply = send(&engine, "s1", "").await;
        assert!(reply.text().starts_with("Welcome to KoviApp"));
        let record = engine.session("s1").await.unwrap();
        assert_eq!(record.risk, 0);
        assert!(record.age_bracket.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_request_deadline_resets_session() {
        let store = Arc::new(FlakyStore::default());
        let engine =
            engine_with(store.clone()).with_request_deadline(Some(Duration::from_secs(1)));
        send(&engine, "s1", "").await;
        send(&engine, "s1", "1").await;

        store.stall_increments.store(true, Ordering::SeqCst);
        let err = engine.respond(&request("s1", "1*1*2")).await.unwrap_err();
        assert!(matches!(err, DialogError::Deadline(d) if d == Duration::from_secs(1)));
        assert_eq!(err.to_string(), "request timed out");
        assert!(engine.session("s1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn handle_leaves_session_on_error() {
        let store = Arc::new(FlakyStore::default());
        store.fail_increments.store(true, Ordering::SeqCst);
        let engine = engine_with(store);
        send(&engine, "s1", "1").await;
        assert!(engine.handle(&request("s1", "1*1*1")).await.is_err());
        assert!(!engine.session("s1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn session_ttl_is_set_on_init() {
        let store = Arc::new(MemorySessionStore::new());
        let engine = engine_with(store.clone()).with_session_ttl(Some(Duration::ZERO));
        send(&engine, "s1", "").await;
        assert!(store.is_empty());
    }

    #[test]
    fn request_decodes_camel_case_with_defaults() {
        let req: UssdRequest =
            serde_json::from_str(r#"{"sessionId":"abc","phoneNumber":"+2547","text":"1*1"}"#)
                .unwrap();
        assert_eq!(req.session_id, "abc");
        assert_eq!(req.phone_number, "+2547");
        assert_eq!(req.text, "1*1");
        assert!(req.network_code.is_empty());
        assert!(req.service_code.is_empty());
    }

    #[test]
    fn describe_walks_the_source_chain() {
        let err = DialogError::Store {
            context: "failed to save cases",
            source: StoreError::Timeout(Duration::from_secs(3)),
        };
        assert_eq!(
            describe(&err),
            "failed to save cases: session store call timed out after 3s"
        );
    }
}
