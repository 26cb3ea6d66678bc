use super::domain::Dimension;
use std::collections::BTreeMap;

/// Static catalog of assessment questions, five per dimension.
#[derive(Debug)]
pub struct QuestionBank {
    questions: BTreeMap<Dimension, Vec<&'static str>>,
}

impl QuestionBank {
    pub fn standard() -> Self {
        Self {
            questions: standard_questions(),
        }
    }

    pub fn questions(&self, dimension: Dimension) -> &[&'static str] {
        self.questions
            .get(&dimension)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Expected answer count for a dimension; scoring rejects shorter sets.
    pub fn question_count(&self, dimension: Dimension) -> usize {
        self.questions(dimension).len()
    }
}

/// A named weighting profile. Weights sum to 1.0 within tolerance; the
/// composite score is undefined otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextProfile {
    pub name: &'static str,
    pub label: &'static str,
    weights: [(Dimension, f64); 4],
}

impl ContextProfile {
    pub fn weight(&self, dimension: Dimension) -> f64 {
        self.weights
            .iter()
            .find(|(candidate, _)| *candidate == dimension)
            .map(|(_, weight)| *weight)
            .unwrap_or(0.0)
    }

    pub fn weights(&self) -> &[(Dimension, f64); 4] {
        &self.weights
    }
}

/// Fixed set of weighting profiles, selected once per assessment by name.
#[derive(Debug)]
pub struct ContextCatalog {
    profiles: Vec<ContextProfile>,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown assessment context '{0}'")]
pub struct UnknownContext(pub String);

impl ContextCatalog {
    pub fn standard() -> Self {
        Self {
            profiles: standard_profiles(),
        }
    }

    pub fn lookup(&self, name: &str) -> Result<&ContextProfile, UnknownContext> {
        self.profiles
            .iter()
            .find(|profile| profile.name == name)
            .ok_or_else(|| UnknownContext(name.to_string()))
    }

    pub fn profiles(&self) -> &[ContextProfile] {
        &self.profiles
    }
}

/// Fixed guidance text per dimension; content is reference data, never
/// derived from user input.
#[derive(Debug)]
pub struct GuidanceCatalog {
    guidance: BTreeMap<Dimension, Vec<&'static str>>,
}

impl GuidanceCatalog {
    pub fn standard() -> Self {
        Self {
            guidance: standard_guidance(),
        }
    }

    pub fn guidance(&self, dimension: Dimension) -> &[&'static str] {
        self.guidance
            .get(&dimension)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn standard_questions() -> BTreeMap<Dimension, Vec<&'static str>> {
    let mut questions = BTreeMap::new();
    questions.insert(
        Dimension::Reflection,
        vec![
            "Насколько легко вы прогнозируете последствия своих действий?",
            "Насколько часто вы анализируете причины эмоций и решений?",
            "Можете ли представить себя в альтернативных сценариях?",
            "Насколько вы понимаете свои долгосрочные цели?",
            "Насколько осознанно вы принимаете решения в стрессе?",
        ],
    );
    questions.insert(
        Dimension::Correction,
        vec![
            "Насколько быстро вы учитесь на ошибках?",
            "Насколько легко меняете привычки при необходимости?",
            "Насколько гибко вы реагируете на новые условия?",
            "Можете ли корректировать поведение под обратную связь?",
            "Насколько вы готовы экспериментировать?",
        ],
    );
    questions.insert(
        Dimension::Management,
        vec![
            "Насколько хорошо справляетесь с многозадачностью?",
            "Можете ли переключаться между краткосрочными и долгосрочными целями?",
            "Насколько вы управляете импульсами?",
            "Можете ли координировать действия нескольких людей?",
            "Насколько структурированно вы планируете проекты?",
        ],
    );
    questions.insert(
        Dimension::Creativity,
        vec![
            "Насколько часто генерируете новые идеи?",
            "Насколько ваши решения оригинальны?",
            "Можете ли сочетать разные идеи для нового?",
            "Насколько часто ваши идеи полезны?",
            "Насколько легко находите неожиданные подходы?",
        ],
    );
    questions
}

fn standard_profiles() -> Vec<ContextProfile> {
    vec![
        ContextProfile {
            name: "personal_growth",
            label: "Personal Growth",
            weights: [
                (Dimension::Reflection, 0.3),
                (Dimension::Correction, 0.3),
                (Dimension::Management, 0.2),
                (Dimension::Creativity, 0.2),
            ],
        },
        ContextProfile {
            name: "creativity",
            label: "Creativity",
            weights: [
                (Dimension::Reflection, 0.2),
                (Dimension::Correction, 0.2),
                (Dimension::Management, 0.2),
                (Dimension::Creativity, 0.4),
            ],
        },
        ContextProfile {
            name: "ethics",
            label: "Ethics",
            weights: [
                (Dimension::Reflection, 0.35),
                (Dimension::Correction, 0.3),
                (Dimension::Management, 0.25),
                (Dimension::Creativity, 0.1),
            ],
        },
        ContextProfile {
            name: "ai",
            label: "AI",
            weights: [
                (Dimension::Reflection, 0.25),
                (Dimension::Correction, 0.3),
                (Dimension::Management, 0.25),
                (Dimension::Creativity, 0.2),
            ],
        },
    ]
}

fn standard_guidance() -> BTreeMap<Dimension, Vec<&'static str>> {
    let mut guidance = BTreeMap::new();
    guidance.insert(
        Dimension::Reflection,
        vec![
            "Ведите дневник рефлексии: записывайте мысли и анализируйте принятые решения",
            "Практикуйте медитацию для развития осознанности",
            "Перед важными решениями, анализируйте возможные последствия разных вариантов",
        ],
    );
    guidance.insert(
        Dimension::Correction,
        vec![
            "Создайте привычку анализировать ошибки и извлекать из них уроки",
            "Экспериментируйте с новыми подходами в привычных ситуациях",
            "Регулярно получайте обратную связь и работайте с ней",
        ],
    );
    guidance.insert(
        Dimension::Management,
        vec![
            "Используйте техники тайм-менеджмента (например, матрицу Эйзенхауэра)",
            "Развивайте эмоциональный интеллект для лучшего управления импульсами",
            "Практикуйтесь в расстановке приоритетов и планировании сложных задач",
        ],
    );
    guidance.insert(
        Dimension::Creativity,
        vec![
            "Выделите время для регулярных мозговых штурмов",
            "Изучайте смежные области знаний для генерации новых идей",
            "Практикуйте технику «случайного стимула» для поиска неочевидных решений",
        ],
    );
    guidance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_profile_weights_sum_to_one() {
        let catalog = ContextCatalog::standard();
        for profile in catalog.profiles() {
            let total: f64 = profile.weights().iter().map(|(_, weight)| weight).sum();
            assert!(
                (total - 1.0).abs() < 1e-6,
                "profile '{}' weights sum to {total}",
                profile.name
            );
        }
    }

    #[test]
    fn bank_defines_five_questions_per_dimension() {
        let bank = QuestionBank::standard();
        for dimension in Dimension::ordered() {
            assert_eq!(bank.question_count(dimension), 5, "{}", dimension.code());
        }
    }

    #[test]
    fn guidance_defines_three_entries_per_dimension() {
        let catalog = GuidanceCatalog::standard();
        for dimension in Dimension::ordered() {
            assert_eq!(catalog.guidance(dimension).len(), 3, "{}", dimension.code());
        }
    }

    #[test]
    fn lookup_rejects_unknown_context() {
        let catalog = ContextCatalog::standard();
        let err = catalog.lookup("wellness").expect_err("not a known profile");
        assert_eq!(err.0, "wellness");
    }

    #[test]
    fn ethics_profile_matches_published_weights() {
        let catalog = ContextCatalog::standard();
        let ethics = catalog.lookup("ethics").expect("ethics profile present");
        assert_eq!(ethics.weight(Dimension::Reflection), 0.35);
        assert_eq!(ethics.weight(Dimension::Creativity), 0.1);
    }
}
