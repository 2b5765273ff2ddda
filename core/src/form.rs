//! `multipart/form-data` encoding for API parameters.
//!
//! # Design
//! Every endpoint takes its arguments as form fields, so requests carry a
//! `Parameters` map encoded per RFC 7578. `FormBody` stages the fields in a
//! `ureq` multipart form and is itself an `io::Read`: the encoded bytes are
//! produced as the body is read, and an I/O failure on either side reaches
//! whoever is driving the copy. `encode` drains it into a `Vec<u8>`; the
//! bodies are small text forms and are consumed in full before a request
//! completes anyway.

use std::collections::BTreeMap;
use std::io::{self, Read, Write};

use ureq::unversioned::multipart::Form;

/// Form field name to value, built fresh for every request.
pub type Parameters = BTreeMap<String, String>;

/// A `Parameters` map as a readable multipart body under one random boundary.
pub struct FormBody<'a> {
    form: Form<'a>,
}

impl<'a> FormBody<'a> {
    pub fn new(params: &'a Parameters) -> Self {
        let form = params
            .iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));
        Self { form }
    }

    pub fn boundary(&self) -> &str {
        self.form.boundary()
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary())
    }

    /// Stream the whole body into `sink`. Returns the number of bytes written.
    pub fn write_to<W: Write + ?Sized>(mut self, sink: &mut W) -> io::Result<u64> {
        let written = io::copy(&mut self.form, sink)?;
        sink.flush()?;
        Ok(written)
    }
}

impl Read for FormBody<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.form.read(buf)
    }
}

/// Encode `params` under a fresh boundary, returning the body and its
/// `Content-Type` value.
pub fn encode(params: &Parameters) -> io::Result<(Vec<u8>, String)> {
    let body = FormBody::new(params);
    let content_type = body.content_type();
    let mut buf = Vec::new();
    body.write_to(&mut buf)?;
    Ok((buf, content_type))
}
