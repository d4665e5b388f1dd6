//! Prompt construction for the three generation tasks.
//!
//! Templates are Markdown files compiled into the binary. Each carries
//! `<<<placeholder>>>` slots that [`build`] fills; the function is pure.

use lectern_core::{DomainHint, ExtractedContent, GenerationTask};

const FLASHCARDS_TEMPLATE: &str = include_str!("../prompts/flashcards.md");
const SUMMARY_TEMPLATE: &str = include_str!("../prompts/summary.md");
const SUMMARY_LIMITED_TEMPLATE: &str = include_str!("../prompts/summary_limited.md");
const QUIZ_TEMPLATE: &str = include_str!("../prompts/quiz.md");
const QUIZ_LIMITED_TEMPLATE: &str = include_str!("../prompts/quiz_limited.md");

const CONTENT_PLACEHOLDER: &str = "<<<content>>>";
const DOMAIN_PLACEHOLDER: &str = "<<<domain_guidance>>>";
const EXAMPLE_PLACEHOLDER: &str = "<<<example>>>";
const TOPIC_PLACEHOLDER: &str = "<<<topic>>>";
const COUNT_PLACEHOLDER: &str = "<<<count>>>";

/// Character budget for content judged rich enough to quote.
pub const RICH_CONTENT_BUDGET: usize = 15_000;

/// Character budget for sparse content.
pub const LIMITED_CONTENT_BUDGET: usize = 5_000;

pub const TRUNCATION_MARKER: &str = "... [content truncated]";

/// Domain label whose quiz example uses the imaging question.
const IMAGING_DOMAIN: &str = "biomedical imaging";

const QUIZ_EXAMPLE_GENERAL: &str = r#"[
  {
    "question": "Which of the following best describes the function of mitochondria in eukaryotic cells?",
    "options": ["A. Protein synthesis", "B. Energy production through cellular respiration", "C. Lipid metabolism", "D. DNA replication", "E. Intracellular digestion"],
    "answer": "B. Energy production through cellular respiration",
    "explanation": "Mitochondria are the primary site of ATP production through oxidative phosphorylation. Protein synthesis occurs on ribosomes, DNA replication in the nucleus, and intracellular digestion in lysosomes. Some lipid metabolism happens in mitochondria, but it is not their primary function.",
    "type": "multiple-choice",
    "difficulty": "easy"
  }
]"#;

const QUIZ_EXAMPLE_IMAGING: &str = r#"[
  {
    "question": "Which imaging modality is most appropriate for evaluating soft tissue injuries without radiation exposure?",
    "options": ["A. Computed Tomography (CT)", "B. Magnetic Resonance Imaging (MRI)", "C. X-ray", "D. Positron Emission Tomography (PET)", "E. Angiography"],
    "answer": "B. Magnetic Resonance Imaging (MRI)",
    "explanation": "MRI gives excellent soft tissue contrast without ionizing radiation. CT and X-ray use ionizing radiation and show soft tissue poorly, PET relies on radioactive tracers, and angiography evaluates blood vessels.",
    "type": "multiple-choice",
    "difficulty": "easy"
  }
]"#;

/// Build the prompt for a task. Summary and quiz prompts switch to the
/// limited-context template when the content is sparse.
pub fn build(task: &GenerationTask, domain: &DomainHint) -> String {
    match task {
        GenerationTask::Flashcards { topic, count } => FLASHCARDS_TEMPLATE
            .replace(COUNT_PLACEHOLDER, &count.to_string())
            .replace(DOMAIN_PLACEHOLDER, &flashcard_guidance(domain))
            .replace(TOPIC_PLACEHOLDER, topic.trim()),
        GenerationTask::Summary { content } => {
            let (template, guidance) = if content.is_sparse {
                (SUMMARY_LIMITED_TEMPLATE, limited_guidance(domain, "notes"))
            } else {
                (SUMMARY_TEMPLATE, rich_guidance(domain, "notes"))
            };
            fill_content(template.replace(DOMAIN_PLACEHOLDER, &guidance), content)
        }
        GenerationTask::Quiz { content } => {
            let (template, guidance) = if content.is_sparse {
                (QUIZ_LIMITED_TEMPLATE, limited_guidance(domain, "questions"))
            } else {
                (QUIZ_TEMPLATE, rich_guidance(domain, "questions"))
            };
            let example = if domain.labels().iter().any(|l| l == IMAGING_DOMAIN) {
                QUIZ_EXAMPLE_IMAGING
            } else {
                QUIZ_EXAMPLE_GENERAL
            };
            let prompt = template
                .replace(DOMAIN_PLACEHOLDER, &guidance)
                .replace(EXAMPLE_PLACEHOLDER, example);
            fill_content(prompt, content)
        }
    }
}

/// Content goes in last so placeholder-like text inside a document is never expanded.
fn fill_content(prompt: String, content: &ExtractedContent) -> String {
    let budget = if content.is_sparse {
        LIMITED_CONTENT_BUDGET
    } else {
        RICH_CONTENT_BUDGET
    };
    prompt.replace(CONTENT_PLACEHOLDER, &truncate_chars(&content.text, budget))
}

/// Keep at most `budget` characters, marking the cut.
pub fn truncate_chars(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => format!("{}\n{}", text[..cut].trim_end(), TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

fn flashcard_guidance(domain: &DomainHint) -> String {
    match domain.primary() {
        Some(_) => format!("Frame the cards within {}.", domain),
        None => "Frame the cards within the academic field the topic belongs to.".to_string(),
    }
}

/// With readable content the text stays authoritative; the domain only shapes organization.
fn rich_guidance(domain: &DomainHint, artifact: &str) -> String {
    if domain.is_empty() {
        return format!("Organize the {} around the main topics and subtopics of the content.", artifact);
    }
    format!(
        "This material relates to {}. Use that only to organize the {}: cover fundamental principles, \
         key mechanisms and processes, applications, and connections between concepts, \
         drawing every fact from the content itself.",
        domain, artifact
    )
}

fn limited_guidance(domain: &DomainHint, artifact: &str) -> String {
    if domain.is_empty() {
        return format!(
            "No subject could be detected. Infer the likely subject from the file name and any readable text, \
             write {} on fundamental concepts of that subject, and state that they are based on limited information.",
            artifact
        );
    }
    format!(
        "The document appears to be related to {}. Write {} on the core concepts, principles, \
         mechanisms, and applications of these subjects.",
        domain, artifact
    )
}
