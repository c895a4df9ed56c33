//! Editor collaborator seam.
//!
//! The session controller only needs get/set text and a syntax-mode hint, so
//! that is the entire interface. `BufferEditor` is the plain in-memory
//! implementation used by the CLI and tests.

pub trait EditorWidget {
    fn text(&self) -> String;
    fn set_text(&mut self, text: &str);
    fn set_mode(&mut self, mode: &str);
}

#[derive(Debug, Clone)]
pub struct BufferEditor {
    text: String,
    mode: String,
}

impl Default for BufferEditor {
    fn default() -> Self {
        Self {
            text: String::new(),
            mode: "text/plain".to_string(),
        }
    }
}

impl BufferEditor {
    #[cfg(test)]
    pub(crate) fn mode(&self) -> &str {
        &self.mode
    }
}

impl EditorWidget for BufferEditor {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn set_mode(&mut self, mode: &str) {
        self.mode = mode.to_string();
    }
}
