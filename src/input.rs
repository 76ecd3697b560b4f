use crate::types::{Complex, ViewState};
impl ViewState {
    ///button pressed over the source view, the point is added twice so a
    ///click without movement still leaves a dot, drawing hides the hover sample
    pub fn press(&mut self, z: Complex) {
        self.pen_down = true;
        self.set_pointer(None);
        self.append_point(Some(z));
        self.append_point(Some(z));
    }
    ///pointer moved over the source view, held is the primary button state
    pub fn motion(&mut self, z: Complex, held: bool) {
        if !held {
            //the release happened somewhere we did not hear about it
            if self.pen_down {
                self.release();
            }
            self.set_pointer(Some(z));
        } else if self.pen_down {
            self.append_point(Some(z));
        }
    }
    ///pointer left the source view
    pub fn leave(&mut self, held: bool) {
        if held && self.pen_down {
            self.append_point(None);
        } else {
            self.set_pointer(None);
        }
    }
    ///button released anywhere, ends the current stroke
    pub fn release(&mut self) {
        if self.pen_down {
            self.pen_down = false;
            self.append_point(None);
        }
    }
    pub fn is_drawing(&self) -> bool {
        self.pen_down
    }
}
