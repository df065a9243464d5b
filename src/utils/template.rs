use crate::models::candidate::Candidate;

/// Course fallback when the candidate applied without picking one.
pub const MISSING_COURSE: &str = "N/A";

/// Values for the literal placeholder tokens an email template may carry:
/// `{nome}`, `{email}`, `{curso}`, `{estado}`, `{pais}`, `{telefone}`.
/// Unknown tokens are left in the text untouched.
pub struct TemplateContext<'a> {
    pub nome: &'a str,
    pub email: &'a str,
    pub curso: &'a str,
    pub estado: &'a str,
    pub pais: &'a str,
    pub telefone: &'a str,
}

impl<'a> TemplateContext<'a> {
    pub fn for_candidate(candidate: &'a Candidate) -> Self {
        Self {
            nome: &candidate.name,
            email: &candidate.email,
            curso: candidate.course_name.as_deref().unwrap_or(MISSING_COURSE),
            estado: candidate.status.as_str(),
            pais: candidate.country.as_deref().unwrap_or(""),
            telefone: candidate.phone.as_deref().unwrap_or(""),
        }
    }
}

pub fn render(template: &str, ctx: &TemplateContext) -> String {
    template
        .replace("{nome}", ctx.nome)
        .replace("{email}", ctx.email)
        .replace("{curso}", ctx.curso)
        .replace("{estado}", ctx.estado)
        .replace("{pais}", ctx.pais)
        .replace("{telefone}", ctx.telefone)
}
