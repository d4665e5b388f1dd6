//! Deterministic sample content served when generation or parsing fails.
//!
//! The library is a plain table: one generic set plus domain-flavoured sets.
//! Every entry is schema-valid, so callers can return it without re-checking.

use lectern_core::{DomainHint, FlashcardRecord, GeneratedRecords, GenerationTask, QuizDraft, SummaryRecord};

struct QuizSeed {
    question: &'static str,
    options: &'static [&'static str],
    answer: &'static str,
    explanation: &'static str,
    question_type: &'static str,
    difficulty: &'static str,
}

struct FallbackSet {
    /// Matched as a substring of detected domain labels.
    key: &'static str,
    flashcards: &'static [(&'static str, &'static str)],
    summaries: &'static [(&'static str, &'static str)],
    quiz: &'static [QuizSeed],
}

// ── Library ───────────────────────────────────────────────────

static GENERIC: FallbackSet = FallbackSet {
    key: "",
    flashcards: &[(
        "Why are flashcards an effective study tool?",
        "Flashcards promote active recall, which strengthens memory and improves long-term retention.",
    )],
    summaries: &[
        (
            "Key Concepts Overview",
            "The analysis could not process this material. Typical course content covers cell structures, molecular mechanisms, physiological processes, and their clinical applications.",
        ),
        (
            "Important Terminology",
            "While the specific content could not be analyzed, documents like this usually define terms for cellular components, biochemical pathways, anatomical structures, and related medical concepts.",
        ),
    ],
    quiz: &[
        QuizSeed {
            question: "Which cellular organelle is primarily responsible for energy production in eukaryotic cells?",
            options: &["A. Nucleus", "B. Mitochondria", "C. Golgi apparatus", "D. Endoplasmic reticulum", "E. Lysosome"],
            answer: "B. Mitochondria",
            explanation: "Mitochondria produce ATP through cellular respiration. The nucleus stores genetic material, the Golgi apparatus packages proteins, the endoplasmic reticulum synthesises and transports proteins, and lysosomes hold digestive enzymes.",
            question_type: "multiple-choice",
            difficulty: "easy",
        },
        QuizSeed {
            question: "Which of the following best describes the process of cellular respiration?",
            options: &[
                "A. Converting light energy into chemical energy",
                "B. Breaking down glucose to produce ATP, CO2, and H2O",
                "C. Using oxygen to directly synthesize proteins",
                "D. Converting CO2 and H2O into glucose",
            ],
            answer: "B. Breaking down glucose to produce ATP, CO2, and H2O",
            explanation: "Cellular respiration breaks down glucose to release energy as ATP, with carbon dioxide and water as byproducts. Options A and D describe photosynthesis and option C describes no real process.",
            question_type: "multiple-choice",
            difficulty: "medium",
        },
        QuizSeed {
            question: "In a patient presenting with symptoms of hyperglycemia, which of the following would you expect to observe?",
            options: &[
                "A. Decreased blood glucose levels",
                "B. Increased insulin sensitivity",
                "C. Polyuria (excessive urination)",
                "D. Hypoglycemic seizures",
            ],
            answer: "C. Polyuria (excessive urination)",
            explanation: "High blood glucose drives polyuria as the kidneys excrete excess glucose and water. Options A and D belong to hypoglycemia, and increased insulin sensitivity would lower blood glucose.",
            question_type: "case-based",
            difficulty: "hard",
        },
    ],
};

static DOMAIN_SETS: &[FallbackSet] = &[
    FallbackSet {
        key: "anatomy",
        flashcards: &[
            (
                "What are the four chambers of the human heart?",
                "Right atrium, right ventricle, left atrium, and left ventricle.",
            ),
            (
                "Which bone is the longest in the human body?",
                "The femur, which runs from the hip to the knee.",
            ),
        ],
        summaries: &[
            (
                "Anatomical Position and Planes",
                "Anatomy describes structures relative to the anatomical position: standing upright, facing forward, palms forward. Sagittal, coronal, and transverse planes divide the body for sectional study.",
            ),
            (
                "Organ Systems",
                "The body is organised into systems such as skeletal, muscular, cardiovascular, and nervous, each built from organs whose structure reflects their function.",
            ),
        ],
        quiz: &[QuizSeed {
            question: "Which plane divides the body into anterior and posterior parts?",
            options: &["A. Sagittal plane", "B. Coronal plane", "C. Transverse plane", "D. Oblique plane"],
            answer: "B. Coronal plane",
            explanation: "The coronal (frontal) plane separates front from back. The sagittal plane separates left from right, the transverse plane separates upper from lower, and oblique planes cut at an angle.",
            question_type: "multiple-choice",
            difficulty: "easy",
        }],
    },
    FallbackSet {
        key: "genetics",
        flashcards: &[
            (
                "What is a gene?",
                "A DNA sequence that encodes a functional product, usually a protein.",
            ),
            (
                "What is the difference between genotype and phenotype?",
                "Genotype is the genetic makeup; phenotype is the observable trait it produces with the environment.",
            ),
        ],
        summaries: &[
            (
                "DNA Structure and Replication",
                "DNA is a double helix of complementary nucleotide strands. Replication is semi-conservative: each new molecule keeps one parental strand.",
            ),
            (
                "Patterns of Inheritance",
                "Mendelian inheritance covers dominant and recessive alleles segregating independently. Linkage, sex linkage, and polygenic traits explain departures from simple ratios.",
            ),
        ],
        quiz: &[QuizSeed {
            question: "Two heterozygous parents (Aa x Aa) have a child. What is the probability the child shows the recessive phenotype?",
            options: &["A. 0%", "B. 25%", "C. 50%", "D. 75%"],
            answer: "B. 25%",
            explanation: "Only the aa genotype shows the recessive phenotype, and it arises in one of four equally likely combinations. 75% is the probability of the dominant phenotype.",
            question_type: "multiple-choice",
            difficulty: "medium",
        }],
    },
    FallbackSet {
        key: "immunology",
        flashcards: &[
            (
                "What is an antigen?",
                "A molecule recognised by the immune system that can trigger an immune response.",
            ),
            (
                "Which cells produce antibodies?",
                "Plasma cells, which differentiate from activated B lymphocytes.",
            ),
        ],
        summaries: &[
            (
                "Innate and Adaptive Immunity",
                "Innate immunity responds quickly and non-specifically through barriers, phagocytes, and inflammation. Adaptive immunity is slower, antigen-specific, and forms memory.",
            ),
            (
                "Antibody Structure and Function",
                "Antibodies are Y-shaped proteins with variable regions that bind antigens and constant regions that recruit effector functions such as complement and phagocytosis.",
            ),
        ],
        quiz: &[QuizSeed {
            question: "Immunological memory is a feature of the adaptive immune system.",
            options: &["True", "False"],
            answer: "True",
            explanation: "Memory B and T cells let the adaptive system respond faster and more strongly on re-exposure. Innate responses do not build antigen-specific memory.",
            question_type: "true-false",
            difficulty: "easy",
        }],
    },
    FallbackSet {
        key: "pharmacology",
        flashcards: &[
            (
                "What is a drug's half-life?",
                "The time taken for its plasma concentration to fall by half.",
            ),
            (
                "What does the therapeutic index measure?",
                "Drug safety: the ratio between toxic and effective doses.",
            ),
        ],
        summaries: &[
            (
                "Pharmacokinetics",
                "Pharmacokinetics describes what the body does to a drug: absorption, distribution, metabolism, and excretion, which together set plasma levels over time.",
            ),
            (
                "Pharmacodynamics",
                "Pharmacodynamics describes what a drug does to the body: receptor binding, agonist and antagonist action, and dose-response relationships.",
            ),
        ],
        quiz: &[QuizSeed {
            question: "A drug with a narrow therapeutic index requires which of the following?",
            options: &[
                "A. No monitoring",
                "B. Careful dose titration and plasma level monitoring",
                "C. Doubling the initial dose",
                "D. Administration only by mouth",
            ],
            answer: "B. Careful dose titration and plasma level monitoring",
            explanation: "A narrow therapeutic index means toxic and effective doses are close, so dosing must be adjusted carefully. The other options ignore or increase the toxicity risk.",
            question_type: "multiple-choice",
            difficulty: "medium",
        }],
    },
    FallbackSet {
        key: "imaging",
        flashcards: &[
            (
                "Which imaging modality gives the best soft tissue contrast without ionizing radiation?",
                "Magnetic resonance imaging (MRI).",
            ),
            (
                "What does a CT scanner measure?",
                "X-ray attenuation through the body from many angles, reconstructed into cross-sectional images.",
            ),
        ],
        summaries: &[
            (
                "Imaging Modalities",
                "X-ray, CT, MRI, ultrasound, and PET differ in physical principle, radiation exposure, and the tissues they depict best.",
            ),
            (
                "Choosing a Modality",
                "Modality choice balances diagnostic question, patient safety, availability, and cost; for example ultrasound is preferred in pregnancy and CT for acute head trauma.",
            ),
        ],
        quiz: &[QuizSeed {
            question: "Which imaging modality is most appropriate for evaluating soft tissue injuries without radiation exposure?",
            options: &[
                "A. Computed Tomography (CT)",
                "B. Magnetic Resonance Imaging (MRI)",
                "C. X-ray",
                "D. Positron Emission Tomography (PET)",
            ],
            answer: "B. Magnetic Resonance Imaging (MRI)",
            explanation: "MRI offers excellent soft tissue contrast without ionizing radiation. CT and X-ray use ionizing radiation, and PET relies on radioactive tracers.",
            question_type: "multiple-choice",
            difficulty: "easy",
        }],
    },
    FallbackSet {
        key: "neuroscience",
        flashcards: &[
            (
                "What is an action potential?",
                "A rapid, self-propagating reversal of a neuron's membrane potential.",
            ),
            (
                "What is a synapse?",
                "The junction where a neuron passes a signal to another cell, usually via neurotransmitters.",
            ),
        ],
        summaries: &[
            (
                "Neurons and Signalling",
                "Neurons receive input through dendrites, integrate it at the soma, and fire action potentials along the axon. Myelin speeds conduction by saltatory propagation.",
            ),
            (
                "Organisation of the Nervous System",
                "The central nervous system comprises brain and spinal cord; the peripheral system carries sensory and motor signals, with autonomic branches controlling internal organs.",
            ),
        ],
        quiz: &[QuizSeed {
            question: "Which ion's influx is chiefly responsible for the depolarisation phase of a neuronal action potential?",
            options: &["A. Potassium", "B. Sodium", "C. Chloride", "D. Magnesium"],
            answer: "B. Sodium",
            explanation: "Voltage-gated sodium channels open and sodium rushes in, depolarising the membrane. Potassium efflux drives repolarisation, and chloride influx is usually inhibitory.",
            question_type: "multiple-choice",
            difficulty: "medium",
        }],
    },
];

// ── Selection ─────────────────────────────────────────────────

fn select(domain: &DomainHint) -> &'static FallbackSet {
    DOMAIN_SETS
        .iter()
        .find(|set| domain.labels().iter().any(|label| label.contains(set.key)))
        .unwrap_or(&GENERIC)
}

/// Sample records for `task`, flavoured by the detected domain. Never empty.
pub fn fallback(task: &GenerationTask, domain: &DomainHint) -> GeneratedRecords {
    match task {
        GenerationTask::Flashcards { topic, count } => {
            GeneratedRecords::Flashcards(fallback_flashcards(topic, *count, domain))
        }
        GenerationTask::Summary { .. } => GeneratedRecords::Summaries(fallback_summaries(domain)),
        GenerationTask::Quiz { .. } => GeneratedRecords::Quiz(fallback_quiz(domain)),
    }
}

/// Leads with a card naming the topic, then the selected set's cards, up to `count`.
fn fallback_flashcards(topic: &str, count: usize, domain: &DomainHint) -> Vec<FlashcardRecord> {
    let lead = FlashcardRecord::new(
        format!("What is the main concept of {}?", topic.trim()),
        "Specific content for this topic could not be generated. Please try again later or try a related topic.",
    );

    std::iter::once(lead)
        .chain(select(domain).flashcards.iter().map(|(q, a)| FlashcardRecord::new(*q, *a)))
        .take(count.max(1))
        .collect()
}

fn fallback_summaries(domain: &DomainHint) -> Vec<SummaryRecord> {
    select(domain)
        .summaries
        .iter()
        .map(|(title, summary)| SummaryRecord::new(*title, *summary))
        .collect()
}

/// Domain quiz seeds come first, topped up with generic questions.
fn fallback_quiz(domain: &DomainHint) -> Vec<QuizDraft> {
    let set = select(domain);
    let generic = if set.key.is_empty() { &[][..] } else { GENERIC.quiz };
    set.quiz
        .iter()
        .chain(generic.iter())
        .map(|seed| QuizDraft {
            question: Some(seed.question.to_string()),
            options: seed.options.iter().map(|o| o.to_string()).collect(),
            answer: Some(seed.answer.to_string()),
            explanation: Some(seed.explanation.to_string()),
            question_type: Some(seed.question_type.to_string()),
            difficulty: Some(seed.difficulty.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::{ContentType, ExtractedContent};

    fn content() -> ExtractedContent {
        ExtractedContent {
            text: "placeholder".into(),
            content_type: ContentType::Empty,
            is_sparse: true,
        }
    }

    fn all_tasks() -> Vec<GenerationTask> {
        vec![
            GenerationTask::Flashcards { topic: "Osmosis".into(), count: 5 },
            GenerationTask::Summary { content: content() },
            GenerationTask::Quiz { content: content() },
        ]
    }

    fn hint(labels: &[&str]) -> DomainHint {
        DomainHint::new(labels.iter().map(|l| l.to_string()).collect())
    }

    #[test]
    fn every_task_and_domain_gets_records() {
        let domains = [
            hint(&[]),
            hint(&["history"]),
            hint(&["anatomy"]),
            hint(&["genetics"]),
            hint(&["immunology"]),
            hint(&["pharmacology"]),
            hint(&["biomedical imaging"]),
            hint(&["neuroscience"]),
        ];
        for task in all_tasks() {
            for domain in &domains {
                assert!(!fallback(&task, domain).is_empty(), "{} / {}", task.name(), domain);
            }
        }
    }

    #[test]
    fn quiz_library_is_schema_valid() {
        for set in std::iter::once(&GENERIC).chain(DOMAIN_SETS.iter()) {
            for seed in set.quiz {
                let matches = seed.options.iter().filter(|o| **o == seed.answer).count();
                assert_eq!(matches, 1, "answer not unique in options: {}", seed.question);
            }
        }
    }

    #[test]
    fn anatomy_hint_selects_anatomy_set() {
        let records = fallback(&GenerationTask::Summary { content: content() }, &hint(&["anatomy"]));
        let GeneratedRecords::Summaries(summaries) = records else {
            panic!("expected summaries");
        };
        assert_eq!(summaries[0].title, "Anatomical Position and Planes");
    }

    #[test]
    fn imaging_label_matches_by_substring() {
        let records = fallback(&GenerationTask::Quiz { content: content() }, &hint(&["biomedical imaging"]));
        let GeneratedRecords::Quiz(drafts) = records else {
            panic!("expected quiz");
        };
        assert!(drafts[0].question.as_deref().unwrap().contains("soft tissue"));
        assert_eq!(drafts.len(), 1 + GENERIC.quiz.len());
    }

    #[test]
    fn unknown_domain_uses_generic_set() {
        let records = fallback(&GenerationTask::Quiz { content: content() }, &hint(&["history"]));
        let GeneratedRecords::Quiz(drafts) = records else {
            panic!("expected quiz");
        };
        assert_eq!(drafts.len(), GENERIC.quiz.len());
        assert_eq!(drafts[0].answer.as_deref(), Some("B. Mitochondria"));
    }

    #[test]
    fn flashcards_lead_with_topic_and_respect_count() {
        let task = GenerationTask::Flashcards { topic: " Osmosis ".into(), count: 1 };
        let GeneratedRecords::Flashcards(cards) = fallback(&task, &hint(&["genetics"])) else {
            panic!("expected flashcards");
        };
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "What is the main concept of Osmosis?");

        let task = GenerationTask::Flashcards { topic: "Osmosis".into(), count: 10 };
        let GeneratedRecords::Flashcards(cards) = fallback(&task, &hint(&[])) else {
            panic!("expected flashcards");
        };
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].question, "Why are flashcards an effective study tool?");
    }
}
