pub(crate) struct UiActor {
    needs_redraw: bool,
}

impl UiActor {
    pub(crate) fn new() -> Self {
        Self { needs_redraw: true }
    }

    pub(crate) fn mark_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub(crate) fn clear_redraw(&mut self) {
        self.needs_redraw = false;
    }

    pub(crate) fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }
}

#[cfg(test)]
mod tests {
    use super::UiActor;

    #[test]
    fn ui_actor_redraw_flag_roundtrip() {
        let mut actor = UiActor::new();
        assert!(actor.needs_redraw());
        actor.clear_redraw();
        assert!(!actor.needs_redraw());
        actor.mark_redraw();
        assert!(actor.needs_redraw());
    }
}
