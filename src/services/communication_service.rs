use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::communication_dto::{RecipientMode, SendCommunicationPayload, SendTestPayload};
use crate::error::{Error, Result};
use crate::mailer::Mailer;
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::models::notification::NotificationKind;
use crate::services::candidate_service::CANDIDATE_COLUMNS;
use crate::services::notification_service::NotificationService;
use crate::utils::template::{self, TemplateContext, MISSING_COURSE};

/// Validated recipient criteria. Built before any database access so a
/// malformed request never resolves an empty set silently.
#[derive(Debug, Clone, PartialEq)]
pub enum RecipientSelector {
    All,
    Course(Uuid),
    Status(CandidateStatus),
    Custom(Vec<Uuid>),
}

impl RecipientSelector {
    pub fn from_payload(payload: &SendCommunicationPayload) -> Result<Self> {
        match payload.mode {
            RecipientMode::All => Ok(Self::All),
            RecipientMode::Course => payload.course_id.map(Self::Course).ok_or_else(|| {
                Error::BadRequest("O modo 'course' requer o campo courseId".to_string())
            }),
            RecipientMode::Status => payload.status.map(Self::Status).ok_or_else(|| {
                Error::BadRequest("O modo 'status' requer o campo status".to_string())
            }),
            RecipientMode::Custom => match payload.candidate_ids.as_deref() {
                Some(ids) if !ids.is_empty() => Ok(Self::Custom(ids.to_vec())),
                _ => Err(Error::BadRequest(
                    "O modo 'custom' requer uma lista de candidatos".to_string(),
                )),
            },
        }
    }
}

/// Tally of one dispatch run. Every resolved recipient lands in exactly one
/// of the two counters, so `success + failed` equals the resolved total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendReport {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl SendReport {
    fn delivered(mut self) -> Self {
        self.success += 1;
        self
    }

    fn rejected(mut self, error: String) -> Self {
        self.failed += 1;
        self.errors.push(error);
        self
    }

    pub fn resolved(&self) -> usize {
        self.success + self.failed
    }
}

// Raw transport errors are logged, never serialized; the tally carries a
// short Portuguese line naming the recipient.
fn recipient_error(email: &str, err: &Error) -> String {
    match err {
        Error::Provider(detail) => format!("{}: o fornecedor rejeitou o envio ({})", email, detail),
        _ => format!("{}: falha no envio", email),
    }
}

#[derive(Clone)]
pub struct CommunicationService {
    pool: PgPool,
    mailer: Arc<dyn Mailer>,
    notifications: NotificationService,
}

impl CommunicationService {
    pub fn new(pool: PgPool, mailer: Arc<dyn Mailer>, notifications: NotificationService) -> Self {
        Self {
            pool,
            mailer,
            notifications,
        }
    }

    pub async fn send(&self, payload: SendCommunicationPayload) -> Result<SendReport> {
        let selector = RecipientSelector::from_payload(&payload)?;
        let recipients = self.resolve(&selector).await?;
        self.deliver(recipients, &payload.subject, &payload.message)
            .await
    }

    /// Renders the payload once per recipient and sends each message on its
    /// own, then records an outcome notification. Exposed to the crate so
    /// tests can drive it with a hand-built recipient set.
    pub(crate) async fn deliver(
        &self,
        recipients: Vec<Candidate>,
        subject: &str,
        body: &str,
    ) -> Result<SendReport> {
        if recipients.is_empty() {
            return Err(Error::BadRequest(
                "Nenhum candidato encontrado para os critérios indicados".to_string(),
            ));
        }

        let report = if let [single] = recipients.as_slice() {
            self.send_single(single, subject, body).await
        } else {
            self.dispatch_all(&recipients, subject, body).await
        };

        self.notify_outcome(&report).await;
        Ok(report)
    }

    async fn resolve(&self, selector: &RecipientSelector) -> Result<Vec<Candidate>> {
        let base = format!("SELECT {CANDIDATE_COLUMNS} FROM candidates");
        let recipients = match selector {
            RecipientSelector::All => {
                let sql = format!("{base} ORDER BY applied_at");
                sqlx::query_as::<_, Candidate>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
            RecipientSelector::Course(course_id) => {
                let sql = format!("{base} WHERE course_id = $1 ORDER BY applied_at");
                sqlx::query_as::<_, Candidate>(&sql)
                    .bind(course_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            RecipientSelector::Status(status) => {
                let sql = format!("{base} WHERE status = $1 ORDER BY applied_at");
                sqlx::query_as::<_, Candidate>(&sql)
                    .bind(*status)
                    .fetch_all(&self.pool)
                    .await?
            }
            RecipientSelector::Custom(ids) => {
                let sql = format!("{base} WHERE id = ANY($1) ORDER BY applied_at");
                sqlx::query_as::<_, Candidate>(&sql)
                    .bind(ids.clone())
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(recipients)
    }

    async fn dispatch_one(&self, candidate: &Candidate, subject: &str, body: &str) -> Result<()> {
        let ctx = TemplateContext::for_candidate(candidate);
        let subject = template::render(subject, &ctx);
        let html = template::render(body, &ctx);
        self.mailer.send(&candidate.email, &subject, &html).await
    }

    /// Exactly one resolved recipient skips the batch loop. Same tally
    /// shape, no fold.
    async fn send_single(&self, candidate: &Candidate, subject: &str, body: &str) -> SendReport {
        match self.dispatch_one(candidate, subject, body).await {
            Ok(()) => SendReport::default().delivered(),
            Err(err) => {
                tracing::error!(error = %err, recipient = %candidate.email, "send failed");
                SendReport::default().rejected(recipient_error(&candidate.email, &err))
            }
        }
    }

    /// Sequential fold over the recipient set. A failed send moves the
    /// tally and the loop continues; nothing aborts the batch, so a
    /// provider outage shows up as one failure per recipient.
    async fn dispatch_all(
        &self,
        recipients: &[Candidate],
        subject: &str,
        body: &str,
    ) -> SendReport {
        let mut report = SendReport::default();
        for candidate in recipients {
            report = match self.dispatch_one(candidate, subject, body).await {
                Ok(()) => report.delivered(),
                Err(err) => {
                    tracing::error!(error = %err, recipient = %candidate.email, "send failed");
                    report.rejected(recipient_error(&candidate.email, &err))
                }
            };
        }
        report
    }

    async fn notify_outcome(&self, report: &SendReport) {
        let (title, kind) = if report.failed > 0 {
            (
                "Envio de emails concluído com falhas",
                NotificationKind::Warning,
            )
        } else {
            ("Envio de emails concluído", NotificationKind::Success)
        };
        let message = format!(
            "{} enviados com sucesso, {} falhados",
            report.success, report.failed
        );
        self.notifications.record(title, &message, kind).await;
    }

    /// Single rendered email to an explicit address; transport failure is
    /// the caller's problem here, unlike inside the batch.
    pub async fn send_test(&self, payload: SendTestPayload) -> Result<()> {
        let ctx = TemplateContext {
            nome: "Candidato de Teste",
            email: &payload.email,
            curso: MISSING_COURSE,
            estado: CandidateStatus::Registered.as_str(),
            pais: "",
            telefone: "",
        };
        let subject = template::render(&payload.subject, &ctx);
        let html = template::render(&payload.message, &ctx);
        self.mailer.send(&payload.email, &subject, &html).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::MockMailer;
    use chrono::Utc;
    use mockall::predicate::eq;
    use sqlx::postgres::PgPoolOptions;

    // Never connects; notification inserts fail fast and must be swallowed.
    fn dead_pool() -> PgPool {
        PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(50))
            .connect_lazy("postgres://127.0.0.1:1/unreachable")
            .expect("lazy pool")
    }

    fn service(mailer: MockMailer) -> CommunicationService {
        let pool = dead_pool();
        let notifications = NotificationService::new(pool.clone());
        CommunicationService::new(pool, Arc::new(mailer), notifications)
    }

    fn candidate(n: usize) -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            name: format!("Candidato {}", n),
            email: format!("c{}@example.com", n),
            country: Some("Portugal".into()),
            phone: None,
            age: Some(25),
            education: None,
            experience: None,
            notes: None,
            course_id: None,
            course_name: Some("Soldadura".into()),
            status: CandidateStatus::Registered,
            attachments: vec![],
            document_names: vec![],
            applied_at: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn payload(mode: RecipientMode) -> SendCommunicationPayload {
        SendCommunicationPayload {
            mode,
            course_id: None,
            status: None,
            candidate_ids: None,
            subject: "Olá {nome}".into(),
            message: "O curso {curso} espera por si".into(),
        }
    }

    #[test]
    fn selector_requires_mode_discriminator() {
        assert_eq!(
            RecipientSelector::from_payload(&payload(RecipientMode::All)).unwrap(),
            RecipientSelector::All
        );
        assert!(matches!(
            RecipientSelector::from_payload(&payload(RecipientMode::Course)),
            Err(Error::BadRequest(_))
        ));
        assert!(matches!(
            RecipientSelector::from_payload(&payload(RecipientMode::Status)),
            Err(Error::BadRequest(_))
        ));
        assert!(matches!(
            RecipientSelector::from_payload(&payload(RecipientMode::Custom)),
            Err(Error::BadRequest(_))
        ));

        let mut with_ids = payload(RecipientMode::Custom);
        with_ids.candidate_ids = Some(vec![]);
        assert!(RecipientSelector::from_payload(&with_ids).is_err());
        with_ids.candidate_ids = Some(vec![Uuid::new_v4()]);
        assert!(RecipientSelector::from_payload(&with_ids).is_ok());
    }

    #[tokio::test]
    async fn empty_recipient_set_rejected_before_any_send() {
        // No expectations: a single send call would panic the mock.
        let svc = service(MockMailer::new());
        let err = svc.deliver(vec![], "Olá", "corpo").await.unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn full_batch_success_tally() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(3).returning(|_, _, _| Ok(()));

        let svc = service(mailer);
        let recipients = vec![candidate(1), candidate(2), candidate(3)];
        let report = svc.deliver(recipients, "Olá {nome}", "corpo").await.unwrap();

        assert_eq!(report.success, 3);
        assert_eq!(report.failed, 0);
        assert_eq!(report.resolved(), 3);
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn one_failure_never_aborts_the_batch() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(5).returning(|to, _, _| {
            if to == "c3@example.com" {
                Err(Error::Provider("status 500".into()))
            } else {
                Ok(())
            }
        });

        let svc = service(mailer);
        let recipients = (1..=5).map(candidate).collect();
        let report = svc.deliver(recipients, "Olá", "corpo").await.unwrap();

        assert_eq!(report.success, 4);
        assert_eq!(report.failed, 1);
        assert_eq!(report.resolved(), 5);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("c3@example.com"));
    }

    #[tokio::test]
    async fn provider_outage_fails_each_recipient_individually() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(4)
            .returning(|_, _, _| Err(Error::Provider("status 503".into())));

        let svc = service(mailer);
        let recipients = (1..=4).map(candidate).collect();
        let report = svc.deliver(recipients, "Olá", "corpo").await.unwrap();

        assert_eq!(report.success, 0);
        assert_eq!(report.failed, 4);
        assert_eq!(report.errors.len(), 4);
        for (i, error) in report.errors.iter().enumerate() {
            assert!(error.starts_with(&format!("c{}@example.com", i + 1)));
        }
    }

    #[tokio::test]
    async fn single_recipient_goes_through_the_single_path() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .withf(|to, subject, html| {
                to == "c1@example.com"
                    && subject == "Olá Candidato 1"
                    && html.contains("Soldadura")
            })
            .returning(|_, _, _| Ok(()));

        let svc = service(mailer);
        let report = svc
            .deliver(
                vec![candidate(1)],
                "Olá {nome}",
                "O curso {curso} espera por si",
            )
            .await
            .unwrap();

        assert_eq!(report.success, 1);
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn missing_course_renders_na_in_both_parts() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .withf(|_, subject, html| subject == "Curso: N/A" && html == "Inscrito em N/A")
            .returning(|_, _, _| Ok(()));

        let svc = service(mailer);
        let mut solo = candidate(1);
        solo.course_name = None;
        svc.deliver(vec![solo], "Curso: {curso}", "Inscrito em {curso}")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn notification_failure_never_surfaces() {
        // The dead pool guarantees notify_outcome cannot record anything;
        // the dispatch result must still come back clean.
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(2).returning(|_, _, _| Ok(()));

        let svc = service(mailer);
        let report = svc
            .deliver(vec![candidate(1), candidate(2)], "Olá", "corpo")
            .await
            .unwrap();
        assert_eq!(report.success, 2);
    }

    #[tokio::test]
    async fn test_email_propagates_transport_failure() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .with(eq("admin@example.com"), eq("Teste"), eq("corpo"))
            .times(1)
            .returning(|_, _, _| Err(Error::Provider("status 500".into())));

        let svc = service(mailer);
        let err = svc
            .send_test(SendTestPayload {
                email: "admin@example.com".into(),
                subject: "Teste".into(),
                message: "corpo".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }
}
