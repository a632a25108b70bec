//! Synthetic referral documents for tests.
//!
//! The line positions mirror the two known templates. Filler lines never contain an
//! anchor or anything shaped like a procedure code.

pub(crate) struct DocumentBuilder {
    lines: Vec<String>,
}

impl DocumentBuilder {
    pub(crate) fn blank(len: usize) -> Self {
        Self {
            lines: (0..len).map(|i| format!("Filler line {i}\n")).collect(),
        }
    }

    pub(crate) fn set(mut self, index: usize, text: &str) -> Self {
        self.lines[index] = format!("{text}\n");
        self
    }

    pub(crate) fn truncate(mut self, len: usize) -> Self {
        self.lines.truncate(len);
        self
    }

    pub(crate) fn lines(self) -> Vec<String> {
        self.lines
    }
}

pub(crate) fn authorized() -> DocumentBuilder {
    DocumentBuilder::blank(180)
        .set(0, "Referral #: 8842021")
        .set(1, "Doe, Jane (MRN12345)")
        .set(2, "Covered Benefit")
        .set(8, "03/01/2024")
        .set(9, "Approved by plan")
        .set(51, "Routine")
        .set(60, "E0601")
        .set(61, "A4604")
        .set(62, "E0601")
        .set(63, "K0001 wheelchair rental")
        .set(155, "Date of Birth: ")
        .set(156, "01/15/1960")
        .set(165, "Subscriber Date of Birth: ")
        .set(166, "12/12/1950")
}

pub(crate) fn denied() -> DocumentBuilder {
    DocumentBuilder::blank(180)
        .set(0, "Referral #: 7710002")
        .set(1, "Smith, John A (MRN98765)")
        .set(2, "Denied - Not Medically Necessary")
        .set(8, "Received")
        .set(9, "03/05/2024")
        .set(51, "Urgent")
        .set(70, "L3000")
        .set(152, "Date of Birth: 02/02/1950")
        .set(170, "Member Date of Birth: 07/04/1944")
}
