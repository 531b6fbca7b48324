// Prompt templates for the two roles
//
// All templates are fixed; the only runtime inputs are the article fields,
// the interpretations, and the exchange texts. Keyword instructions must
// stay in sync with the classification sets in `signals`.

use crate::article::Article;
use crate::chat::ModelRole;

/// System prompt for the drafter role.
pub const DRAFTER_SYSTEM: &str = "\
You are the drafter in a two-reader dialogue. You read long articles \
closely and distill them into a small set of atomic notes: each note is \
one insight, self-contained, with a short declarative heading. You write \
plainly and never pad.";

/// System prompt for the critic role.
pub const CRITIC_SYSTEM: &str = "\
You are the critic in a two-reader dialogue. You judge interpretations \
and note drafts strictly, point at concrete defects, and never approve \
work that fails the stated criteria. You answer in the exact format you \
are asked for.";

pub fn system_for(role: ModelRole) -> &'static str {
    match role {
        ModelRole::Drafter => DRAFTER_SYSTEM,
        ModelRole::Critic => CRITIC_SYSTEM,
    }
}

/// Ask one role for an independent interpretation of the article.
pub fn interpretation(article: &Article, content: &str) -> String {
    format!(
        "Read the following article and state your interpretation: the \
         central claim, the strongest supporting argument, and what a \
         careful reader should take away. 3-6 sentences, no bullet \
         points.\n\n\
         Title: {title}\n\n\
         {content}",
        title = article.title,
        content = content,
    )
}

/// Show a role the other reader's latest interpretation and ask it to
/// either declare alignment or refine its own.
pub fn alignment_review(own: &str, other: &str) -> String {
    format!(
        "Your current interpretation of the article:\n\n{own}\n\n\
         The other reader's interpretation:\n\n{other}\n\n\
         If the two interpretations agree on the article's central claim \
         and takeaway, reply with the single word ALIGNED followed by one \
         shared summary of 2-4 sentences. Otherwise reply with a refined \
         interpretation that reconciles what you can; do not start your \
         reply with the word ALIGNED unless you are declaring agreement."
    )
}

/// Framing used when the round budget runs out without a declared
/// alignment: both final interpretations, kept side by side.
pub fn synthesized(drafter: &str, critic: &str) -> String {
    format!(
        "Synthesized from two perspectives that did not fully converge.\n\n\
         Drafter's reading: {drafter}\n\n\
         Critic's reading: {critic}"
    )
}

/// Initial draft request: article context plus the aligned interpretation.
pub fn initial_draft(article: &Article, interpretation: &str) -> String {
    format!(
        "Article: {title}\n\
         Source URL: {url}\n\n\
         Agreed interpretation:\n{interpretation}\n\n\
         Draft 2-4 atomic notes capturing the article's distinct insights. \
         Format each note as a `## ` heading followed by one short \
         paragraph. Every note must stand on its own without the article, \
         and should weave in a markdown link to the source URL where it \
         reads naturally. Return only the notes.",
        title = article.title,
        url = article.url,
    )
}

/// Critic review of the full raw draft against the five fixed criteria.
pub fn critique(draft: &str) -> String {
    format!(
        "Review this note draft against five criteria: (1) each note is \
         self-contained, (2) each note carries real insight rather than \
         summary, (3) source links are integrated naturally, (4) each \
         note is atomic, one idea only, (5) headings are short and \
         declarative.\n\n\
         {draft}\n\n\
         Respond with exactly one of:\n\
         - APPROVED\n\
         - MARGINAL (remaining issues are not worth another pass)\n\
         - actionable feedback describing what to fix"
    )
}

/// Revision request appended to the drafter's running conversation, which
/// already contains the original prompt and its prior draft.
pub fn revision(critique_text: &str) -> String {
    format!(
        "The critic reviewed your draft:\n\n{critique_text}\n\n\
         Revise the notes to address this feedback. Return the full \
         revised set of notes in the same `## ` heading format."
    )
}
