//! Synthetic payload builders for testing.

use card_grade_core::domain::GradingEvent;
use serde_json::{json, Map, Value};

/// Builds a single pass object as the vision pipeline would emit it.
#[must_use]
pub fn pass_json(centering: f64, corners: f64, edges: f64, surface: f64, final_score: f64) -> Value {
    json!({
        "centering": centering,
        "corners": corners,
        "edges": edges,
        "surface": surface,
        "final": final_score,
    })
}

/// Builds a pass whose sub-scores all equal `final_score`.
#[must_use]
pub fn uniform_pass_json(final_score: f64) -> Value {
    pass_json(final_score, final_score, final_score, final_score, final_score)
}

/// Builder for one raw defect entry.
#[derive(Debug, Clone)]
pub struct DefectBuilder {
    entry: Map<String, Value>,
}

impl DefectBuilder {
    /// Starts a defect with a type and severity.
    #[must_use]
    pub fn new(defect_type: &str, severity: &str) -> Self {
        let mut entry = Map::new();
        entry.insert("type".into(), Value::from(defect_type));
        entry.insert("severity".into(), Value::from(severity));
        Self { entry }
    }

    #[must_use]
    pub fn description(mut self, text: &str) -> Self {
        self.entry.insert("description".into(), Value::from(text));
        self
    }

    /// Adds observed coordinates without a confidence.
    #[must_use]
    pub fn at(mut self, x_percent: f64, y_percent: f64) -> Self {
        self.entry.insert(
            "coordinates".into(),
            json!({"x_percent": x_percent, "y_percent": y_percent}),
        );
        self
    }

    /// Adds observed coordinates with a confidence.
    #[must_use]
    pub fn at_with_confidence(mut self, x_percent: f64, y_percent: f64, confidence: &str) -> Self {
        self.entry.insert(
            "coordinates".into(),
            json!({"x_percent": x_percent, "y_percent": y_percent, "confidence": confidence}),
        );
        self
    }

    /// Adds a free-text location hint.
    #[must_use]
    pub fn location(mut self, text: &str) -> Self {
        self.entry.insert("location".into(), Value::from(text));
        self
    }

    #[must_use]
    pub fn build(self) -> Value {
        Value::Object(self.entry)
    }
}

/// Builder for one side's `{corners, edges, surface}` payload.
#[derive(Debug, Clone, Default)]
pub struct SidePayloadBuilder {
    corners: Map<String, Value>,
    edges: Map<String, Value>,
    surface: Vec<Value>,
}

impl SidePayloadBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a defect to a corner region.
    #[must_use]
    pub fn corner(mut self, key: &str, defect: DefectBuilder) -> Self {
        push_region(&mut self.corners, key, defect.build());
        self
    }

    /// Appends a defect to an edge region.
    #[must_use]
    pub fn edge(mut self, key: &str, defect: DefectBuilder) -> Self {
        push_region(&mut self.edges, key, defect.build());
        self
    }

    /// Appends a defect to the surface bucket.
    #[must_use]
    pub fn surface(mut self, defect: DefectBuilder) -> Self {
        self.surface.push(defect.build());
        self
    }

    #[must_use]
    pub fn build(self) -> Value {
        json!({
            "corners": Value::Object(self.corners),
            "edges": Value::Object(self.edges),
            "surface": Value::Array(self.surface),
        })
    }
}

fn push_region(group: &mut Map<String, Value>, key: &str, defect: Value) {
    let slot = group
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Value::Array(items) = slot {
        items.push(defect);
    }
}

/// Builder for a complete grading-event document.
#[derive(Debug, Clone)]
pub struct GradingEventBuilder {
    id: Option<String>,
    passes: Vec<Value>,
    notes: Vec<String>,
    front: Value,
    back: Value,
}

impl GradingEventBuilder {
    /// Starts an event with three identical clean passes at `final_score`.
    #[must_use]
    pub fn new(final_score: f64) -> Self {
        Self {
            id: None,
            passes: vec![uniform_pass_json(final_score); 3],
            notes: Vec::new(),
            front: Value::Null,
            back: Value::Null,
        }
    }

    /// Starts an event whose three passes have the given finals.
    #[must_use]
    pub fn with_finals(finals: [f64; 3]) -> Self {
        let mut builder = Self::new(finals[0]);
        builder.passes = finals.iter().map(|f| uniform_pass_json(*f)).collect();
        builder
    }

    #[must_use]
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Replaces the passes verbatim. Any count is accepted so tests can build bad input.
    #[must_use]
    pub fn passes(mut self, passes: Vec<Value>) -> Self {
        self.passes = passes;
        self
    }

    #[must_use]
    pub fn note(mut self, note: &str) -> Self {
        self.notes.push(note.to_string());
        self
    }

    #[must_use]
    pub fn front(mut self, payload: Value) -> Self {
        self.front = payload;
        self
    }

    #[must_use]
    pub fn back(mut self, payload: Value) -> Self {
        self.back = payload;
        self
    }

    /// Renders the event document as JSON, with passes keyed `pass_1..`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let passes: Map<String, Value> = self
            .passes
            .iter()
            .enumerate()
            .map(|(i, p)| (format!("pass_{}", i + 1), p.clone()))
            .collect();

        let mut doc = json!({
            "passes": Value::Object(passes),
            "consensus_notes": self.notes,
            "defects": {"front": self.front, "back": self.back},
        });
        if let (Some(id), Value::Object(map)) = (&self.id, &mut doc) {
            map.insert("id".into(), Value::from(id.as_str()));
        }
        doc
    }

    /// Builds the in-memory event.
    ///
    /// # Errors
    ///
    /// Returns an error if the rendered document does not parse as an event.
    pub fn build(&self, source: &str) -> serde_json::Result<GradingEvent> {
        GradingEvent::from_json(source, &self.to_json().to_string())
    }
}
