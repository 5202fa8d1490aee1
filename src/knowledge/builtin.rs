//! Built-in curated knowledge
//!
//! The service works without any external knowledge files: a small verified
//! fact set and the per-topic canned response table are compiled in. File
//! sources loaded at startup layer on top (later inserts overwrite).

use super::store::VerifiedStore;
use super::topics::{Aspect, Topic};

/// Register the built-in verified facts with source attribution
pub fn register_verified_facts(store: &mut VerifiedStore) {
    store.add_fact(
        "heart attack symptoms",
        "Common heart attack symptoms include: chest pain or discomfort, upper body \
         discomfort, shortness of breath, cold sweat, nausea, lightheadedness. Women may \
         experience atypical symptoms like fatigue, indigestion, or anxiety.",
        "CDC: Centers for Disease Control and Prevention",
    );

    store.add_fact(
        "heart attack emergency what to do",
        "If you suspect a heart attack: 1. Call emergency services immediately 2. Chew and \
         swallow aspirin if not allergic 3. Stay calm and rest 4. Loosen tight clothing \
         5. Do not drive yourself to the hospital",
        "American Heart Association",
    );

    store.add_fact(
        "prevent heart attack",
        "Heart attack prevention strategies: quit smoking, exercise regularly, eat a \
         heart-healthy diet, maintain healthy weight, control blood pressure and cholesterol, \
         manage diabetes, reduce stress, limit alcohol consumption.",
        "World Health Organization",
    );

    store.add_fact(
        "stroke symptoms",
        "Stroke symptoms include: 1. Sudden weakness of face, arm, or leg (often on one \
         side). 2. Numbness of face, arm, or leg. 3. Confusion, difficulty speaking or \
         understanding. 4. Difficulty seeing with one or both eyes. 5. Difficulty walking, \
         dizziness, loss of balance. 6. Severe headache with no known cause. 7. Fainting or \
         unconsciousness.",
        "World Health Organization",
    );
}

/// Per-topic hand-authored response texts
struct TopicResponses {
    topic: Topic,
    what_is: &'static str,
    symptoms: &'static str,
    treatment: &'static str,
    causes: &'static str,
    prevention: &'static str,
    emergency: &'static str,
}

/// Canned responses for the topic-fallback tier
pub struct CannedResponses {
    entries: Vec<TopicResponses>,
}

impl CannedResponses {
    /// The standard heart-attack/stroke response table
    pub fn standard() -> Self {
        let entries = vec![
            TopicResponses {
                topic: Topic::HeartAttack,
                what_is: "A heart attack (myocardial infarction) occurs when blood flow to \
                          the heart is blocked, damaging heart muscle tissue. This is a \
                          medical emergency requiring immediate treatment.",
                symptoms: "Chest pain or discomfort, shortness of breath, pain in \
                           arm/neck/jaw, nausea, lightheadedness, cold sweats. Women may \
                           experience different symptoms like fatigue or back pain.",
                treatment: "Call emergency services immediately. Chew aspirin if not \
                            allergic. Perform CPR if trained. Do not delay treatment.",
                causes: "Blocked coronary arteries due to plaque buildup, blood clots, \
                         coronary artery spasm, or spontaneous coronary artery dissection.",
                prevention: "Maintain healthy diet, exercise regularly, avoid smoking, \
                             control blood pressure and cholesterol, manage stress, get \
                             regular checkups.",
                emergency: "Call emergency services immediately. Chew and swallow aspirin \
                            if not allergic. Stay calm and rest, loosen tight clothing, and \
                            do not drive yourself to the hospital.",
            },
            TopicResponses {
                topic: Topic::Stroke,
                what_is: "A stroke occurs when blood supply to part of the brain is \
                          interrupted, preventing brain tissue from getting oxygen and \
                          nutrients, causing brain cells to die within minutes.",
                symptoms: "Remember FAST: Face drooping, Arm weakness, Speech difficulty, \
                           Time to call emergency. Also sudden numbness, confusion, vision \
                           problems, dizziness, severe headache.",
                treatment: "Call emergency immediately. Note time symptoms started. \
                            Ischemic strokes may be treated with clot-busting drugs if \
                            given quickly. Do not give food or drink.",
                causes: "Blocked artery (ischemic stroke) or bleeding in brain \
                         (hemorrhagic stroke). Risk factors include high blood pressure, \
                         smoking, diabetes, high cholesterol.",
                prevention: "Control blood pressure, healthy diet, regular exercise, avoid \
                             smoking, limit alcohol, manage atrial fibrillation if present.",
                emergency: "Call emergency services immediately and note the time symptoms \
                            started. Do not give the person food or drink.",
            },
        ];

        Self { entries }
    }

    /// Render the canned response for a classified question. A topic with
    /// no aspect falls back to the definitional text.
    pub fn response(&self, topic: Topic, aspect: Option<Aspect>) -> Option<String> {
        let entry = self.entries.iter().find(|e| e.topic == topic)?;
        let condition = topic.as_str();

        let text = match aspect.unwrap_or(Aspect::Definition) {
            Aspect::Emergency => format!("Emergency response for {}: {}", condition, entry.emergency),
            Aspect::Symptoms => format!("Symptoms of {}: {}", condition, entry.symptoms),
            Aspect::Treatment => format!("Treatment for {}: {}", condition, entry.treatment),
            Aspect::Causes => format!("Causes of {}: {}", condition, entry.causes),
            Aspect::Prevention => format!("Prevention of {}: {}", condition, entry.prevention),
            Aspect::Definition => format!("About {}: {}", condition, entry.what_is),
        };

        Some(text)
    }
}

impl Default for CannedResponses {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_verified_facts() {
        let mut store = VerifiedStore::new();
        register_verified_facts(&mut store);

        assert_eq!(store.len(), 4);
        let answer = store.lookup("heart attack symptoms").unwrap();
        assert!(answer.contains("chest pain"));
        assert!(answer.contains("[Source: CDC"));
    }

    #[test]
    fn test_registration_is_idempotent() {
        let mut store = VerifiedStore::new();
        register_verified_facts(&mut store);
        register_verified_facts(&mut store);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_canned_response_symptoms() {
        let canned = CannedResponses::standard();
        let text = canned
            .response(Topic::HeartAttack, Some(Aspect::Symptoms))
            .unwrap();
        assert!(text.starts_with("Symptoms of heart attack:"));
        assert!(text.contains("shortness of breath"));
    }

    #[test]
    fn test_canned_response_defaults_to_definition() {
        let canned = CannedResponses::standard();
        let text = canned.response(Topic::Stroke, None).unwrap();
        assert!(text.starts_with("About stroke:"));
    }

    #[test]
    fn test_canned_response_emergency() {
        let canned = CannedResponses::standard();
        let text = canned
            .response(Topic::HeartAttack, Some(Aspect::Emergency))
            .unwrap();
        assert!(text.contains("Call emergency services immediately"));
    }

    // String literal continuations must not leak indentation into the
    // rendered responses
    #[test]
    fn test_builtin_texts_have_no_literal_indentation() {
        let canned = CannedResponses::standard();
        let text = canned
            .response(Topic::HeartAttack, Some(Aspect::Causes))
            .unwrap();
        assert!(!text.contains("  "));
    }
}
