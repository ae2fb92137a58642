use crate::views::Api;

/// The standalone averaging calculator. All state is local; the only server call is the
/// average computation itself, and an empty list is rejected before any request is made.
pub struct CalculatorView {
    numbers: Vec<f64>,
    average: Option<f64>,
    error: Option<&'static str>,
}

impl CalculatorView {
    pub fn new() -> Self {
        Self {
            numbers: Vec::new(),
            average: None,
            error: None,
        }
    }

    pub fn add(&mut self, number: f64) {
        self.numbers.push(number);
    }

    /// Remove by position; out-of-range indexes are ignored.
    pub fn remove(&mut self, index: usize) {
        if index < self.numbers.len() {
            self.numbers.remove(index);
        }
    }

    pub fn reset(&mut self) {
        self.numbers.clear();
        self.average = None;
        self.error = None;
    }

    pub fn numbers(&self) -> &[f64] {
        &self.numbers
    }

    pub async fn calculate<A: Api>(&mut self, api: &A) {
        if self.numbers.is_empty() {
            self.error = Some("Add at least one number");
            return;
        }
        match api.average(&self.numbers).await {
            Ok(average) => {
                self.average = Some(average);
                self.error = None;
            }
            Err(_) => {
                self.average = None;
                self.error = Some("Failed to calculate");
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Engagement Score Calculator\n");
        if self.numbers.is_empty() {
            out.push_str(" No numbers added\n");
        } else {
            for number in &self.numbers {
                out.push_str(&format!(" - {}\n", number));
            }
        }
        if let Some(error) = self.error {
            out.push_str(&format!(" {}\n", error));
        }
        if let Some(average) = self.average {
            out.push_str(&format!(" Average: {:.2}\n", average));
        }
        out
    }
}

impl Default for CalculatorView {
    fn default() -> Self {
        Self::new()
    }
}
