//! Message aggregate root.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::message::{
    error::ValidationError,
    ports::patterns::{IdentifierPatterns, PatternKind},
};

use super::{
    address::EmailAddress,
    attachment::MessageAttachment,
    body::{BodyPart, DataBody, HtmlBody, MessageBody, TextBody},
    folder::{FolderState, MessageAttributes},
    header::{
        Header, HeaderShape, HeaderValidation, HeaderValue, dedup_addresses, empty_address_list,
        merge_addresses,
    },
    ids::{ContentIdRegistry, NIL_MESSAGE_UUID, generate_message_uuid},
};

/// An email message.
///
/// Every mutating operation validates the part it touches and leaves the
/// message unchanged on failure. [`Message::validate`] re-checks the uuid
/// and headers; the validator service performs the deep checks.
///
/// # Examples
///
/// ```
/// use missive::message::domain::{EmailAddress, Message};
///
/// let mut message = Message::new();
/// message.set_subject("Quarterly report").expect("valid subject");
/// message
///     .set_to(vec![
///         EmailAddress::new("A", "a@example.com").expect("valid address"),
///         EmailAddress::new("B", "a@example.com").expect("valid address"),
///     ])
///     .expect("valid recipients");
///
/// let to = message.to().expect("To header");
/// assert_eq!(to.len(), 1);
/// assert_eq!(to.first().map(EmailAddress::name), Some("B"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    uuid: String,
    headers: Vec<Header>,
    body_text: Option<TextBody>,
    body_html: Option<HtmlBody>,
    body_data: Option<DataBody>,
    attachments: Vec<MessageAttachment>,
    folder_state: BTreeMap<String, FolderState>,
    content_ids: ContentIdRegistry,
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

impl Message {
    /// Creates an empty message with the nil uuid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            uuid: NIL_MESSAGE_UUID.to_owned(),
            headers: Vec::new(),
            body_text: None,
            body_html: None,
            body_data: None,
            attachments: Vec::new(),
            folder_state: BTreeMap::new(),
            content_ids: ContentIdRegistry::default(),
        }
    }

    /// Creates a builder routing every field through the validating setters.
    #[must_use]
    pub fn builder() -> MessageBuilder {
        MessageBuilder::default()
    }

    // ------------------------------------------------------------------
    // Uuid
    // ------------------------------------------------------------------

    /// Returns the uuid.
    #[must_use]
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Replaces the uuid.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] if `uuid` does not match the
    /// uuid pattern.
    pub fn set_uuid(
        &mut self,
        uuid: impl Into<String>,
        patterns: &dyn IdentifierPatterns,
    ) -> Result<(), ValidationError> {
        let candidate = uuid.into();
        check_uuid(&candidate, patterns)?;
        self.uuid = candidate;
        Ok(())
    }

    /// Assigns a fresh random uuid and returns it.
    pub fn generate_uuid(&mut self) -> &str {
        self.uuid = generate_message_uuid();
        &self.uuid
    }

    /// Checks the uuid against the uuid pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] naming the uuid.
    pub fn validate_uuid(&self, patterns: &dyn IdentifierPatterns) -> Result<(), ValidationError> {
        check_uuid(&self.uuid, patterns)
    }

    // ------------------------------------------------------------------
    // Headers
    // ------------------------------------------------------------------

    /// Returns the headers in order.
    #[must_use]
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Replaces every header.
    ///
    /// Values are reinterpreted for the shape of their name and validated
    /// leniently; nothing changes if any entry fails.
    ///
    /// # Errors
    ///
    /// Returns the first invalid header.
    pub fn set_headers(&mut self, headers: Vec<Header>) -> Result<(), ValidationError> {
        let normalized = headers
            .into_iter()
            .map(|header| {
                let entry = header.normalized()?;
                entry.validate(HeaderValidation::Lenient)?;
                Ok(entry)
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;
        self.headers = normalized;
        Ok(())
    }

    /// Returns the first header named `name`, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&Header> {
        self.headers.iter().find(|header| header.is_named(name))
    }

    /// Returns `true` if a header named `name` is present.
    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    /// Returns a single-string header value.
    #[must_use]
    pub fn single_string(&self, name: &str) -> Option<&str> {
        match self.header(name)?.value() {
            HeaderValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns a single-address header value; `None` when absent.
    #[must_use]
    pub fn single_address(&self, name: &str) -> Option<&EmailAddress> {
        match self.header(name)?.value() {
            HeaderValue::Address(address) => Some(address),
            _ => None,
        }
    }

    /// Returns an address-list header value.
    #[must_use]
    pub fn address_list(&self, name: &str) -> Option<&[EmailAddress]> {
        match self.header(name)?.value() {
            HeaderValue::AddressList(addresses) => Some(addresses),
            _ => None,
        }
    }

    /// Returns a string-list header value.
    #[must_use]
    pub fn string_list(&self, name: &str) -> Option<&[String]> {
        match self.header(name)?.value() {
            HeaderValue::TextList(items) => Some(items),
            _ => None,
        }
    }

    /// Sets a single-string header and returns its index.
    ///
    /// Any name outside the address and list tables is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty name or a name of another shape.
    pub fn set_header_single_string(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<usize, ValidationError> {
        require_shape(name, HeaderShape::SingleString)?;
        Ok(self.upsert(name, HeaderValue::Text(value.into())))
    }

    /// Sets a single-address header and returns its index.
    ///
    /// # Errors
    ///
    /// Returns an error for a name of another shape or an invalid address.
    pub fn set_header_single_address(
        &mut self,
        name: &str,
        address: EmailAddress,
    ) -> Result<usize, ValidationError> {
        require_shape(name, HeaderShape::SingleAddress)?;
        address.validate()?;
        Ok(self.upsert(name, HeaderValue::Address(address)))
    }

    /// Replaces an address-list header and returns its index.
    ///
    /// Duplicate addresses collapse onto their first position, taking the
    /// display name of the last duplicate.
    ///
    /// # Errors
    ///
    /// Returns an error for a name of another shape, an empty list or an
    /// invalid address.
    pub fn set_header_single_address_array(
        &mut self,
        name: &str,
        addresses: Vec<EmailAddress>,
    ) -> Result<usize, ValidationError> {
        require_shape(name, HeaderShape::AddressList)?;
        if addresses.is_empty() {
            return Err(empty_address_list(name));
        }
        addresses.iter().try_for_each(EmailAddress::validate)?;
        Ok(self.upsert(name, HeaderValue::AddressList(dedup_addresses(addresses))))
    }

    /// Merges addresses into an address-list header and returns its index.
    ///
    /// New addresses are appended; known addresses take the new display
    /// name. An absent header is created, which needs at least one address.
    ///
    /// # Errors
    ///
    /// Returns an error for a name of another shape, an invalid address, or
    /// an empty list when the header is absent.
    pub fn add_to_address_list(
        &mut self,
        name: &str,
        addresses: Vec<EmailAddress>,
    ) -> Result<usize, ValidationError> {
        require_shape(name, HeaderShape::AddressList)?;
        addresses.iter().try_for_each(EmailAddress::validate)?;

        if let Some((index, header)) = self
            .headers
            .iter_mut()
            .enumerate()
            .find(|(_, header)| header.is_named(name))
        {
            info!(header = %name, before = ?header.value(), "merging address list");
            match header.value_mut() {
                HeaderValue::AddressList(existing) => merge_addresses(existing, addresses),
                other => *other = HeaderValue::AddressList(dedup_addresses(addresses)),
            }
            info!(header = %name, after = ?header.value(), "merged address list");
            return Ok(index);
        }

        if addresses.is_empty() {
            return Err(empty_address_list(name));
        }
        Ok(self.upsert(name, HeaderValue::AddressList(dedup_addresses(addresses))))
    }

    /// Sets a string-list header and returns its index.
    ///
    /// # Errors
    ///
    /// Returns an error for a name of another shape or an empty list.
    pub fn set_header_string_list(
        &mut self,
        name: &str,
        values: Vec<String>,
    ) -> Result<usize, ValidationError> {
        require_shape(name, HeaderShape::StringList)?;
        if values.is_empty() {
            return Err(ValidationError::invalid_header(
                name,
                "must be a non-empty list of strings",
            ));
        }
        Ok(self.upsert(name, HeaderValue::TextList(values)))
    }

    /// Validates every header against the taxonomy.
    ///
    /// # Errors
    ///
    /// Returns the first invalid header.
    pub fn validate_headers(&self, mode: HeaderValidation<'_>) -> Result<(), ValidationError> {
        self.headers
            .iter()
            .try_for_each(|header| header.validate(mode))
    }

    fn upsert(&mut self, name: &str, value: HeaderValue) -> usize {
        if let Some((index, header)) = self
            .headers
            .iter_mut()
            .enumerate()
            .find(|(_, header)| header.is_named(name))
        {
            header.set_value(value);
            return index;
        }
        let index = self.headers.len();
        self.headers.push(Header::new(name, value));
        index
    }

    // ------------------------------------------------------------------
    // Typed header accessors
    // ------------------------------------------------------------------

    /// Returns the `Subject` header.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.single_string("Subject")
    }

    /// Sets the `Subject` header.
    ///
    /// # Errors
    ///
    /// Never fails for this name; the signature follows the generic setter.
    pub fn set_subject(&mut self, subject: impl Into<String>) -> Result<usize, ValidationError> {
        self.set_header_single_string("Subject", subject)
    }

    /// Returns the `In-Reply-To` header.
    #[must_use]
    pub fn in_reply_to(&self) -> Option<&str> {
        self.single_string("In-Reply-To")
    }

    /// Sets the `In-Reply-To` header.
    ///
    /// # Errors
    ///
    /// Never fails for this name; the signature follows the generic setter.
    pub fn set_in_reply_to(&mut self, id: impl Into<String>) -> Result<usize, ValidationError> {
        self.set_header_single_string("In-Reply-To", id)
    }

    /// Returns the `Message-Id` header.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.single_string("Message-Id")
    }

    /// Sets the `Message-Id` header.
    ///
    /// # Errors
    ///
    /// Never fails for this name; the signature follows the generic setter.
    pub fn set_message_id(&mut self, id: impl Into<String>) -> Result<usize, ValidationError> {
        self.set_header_single_string("Message-Id", id)
    }

    /// Returns the `Sender` header; `None` when absent.
    #[must_use]
    pub fn sender(&self) -> Option<&EmailAddress> {
        self.single_address("Sender")
    }

    /// Sets the `Sender` header.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn set_sender(&mut self, sender: EmailAddress) -> Result<usize, ValidationError> {
        self.set_header_single_address("Sender", sender)
    }

    /// Returns the `From` header.
    #[must_use]
    pub fn from(&self) -> Option<&[EmailAddress]> {
        self.address_list("From")
    }

    /// Returns the display name of the first `From` address.
    #[must_use]
    #[expect(
        clippy::wrong_self_convention,
        reason = "named after the From header, not a conversion"
    )]
    pub fn from_name(&self) -> Option<&str> {
        self.from()?.first().map(EmailAddress::name)
    }

    /// Returns the first `From` address.
    #[must_use]
    #[expect(
        clippy::wrong_self_convention,
        reason = "named after the From header, not a conversion"
    )]
    pub fn from_address(&self) -> Option<&str> {
        self.from()?.first().map(EmailAddress::address)
    }

    /// Replaces the `From` header.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or an address is invalid.
    pub fn set_from(&mut self, from: Vec<EmailAddress>) -> Result<usize, ValidationError> {
        self.set_header_single_address_array("From", from)
    }

    /// Returns the `To` header.
    #[must_use]
    pub fn to(&self) -> Option<&[EmailAddress]> {
        self.address_list("To")
    }

    /// Replaces the `To` header.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or an address is invalid.
    pub fn set_to(&mut self, to: Vec<EmailAddress>) -> Result<usize, ValidationError> {
        self.set_header_single_address_array("To", to)
    }

    /// Merges addresses into the `To` header.
    ///
    /// # Errors
    ///
    /// Returns an error if an address is invalid, or if the list is empty
    /// and the header is absent.
    pub fn add_to(&mut self, to: Vec<EmailAddress>) -> Result<usize, ValidationError> {
        self.add_to_address_list("To", to)
    }

    /// Returns the `Cc` header.
    #[must_use]
    pub fn cc(&self) -> Option<&[EmailAddress]> {
        self.address_list("Cc")
    }

    /// Replaces the `Cc` header.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or an address is invalid.
    pub fn set_cc(&mut self, cc: Vec<EmailAddress>) -> Result<usize, ValidationError> {
        self.set_header_single_address_array("Cc", cc)
    }

    /// Merges addresses into the `Cc` header.
    ///
    /// # Errors
    ///
    /// Returns an error if an address is invalid, or if the list is empty
    /// and the header is absent.
    pub fn add_cc(&mut self, cc: Vec<EmailAddress>) -> Result<usize, ValidationError> {
        self.add_to_address_list("Cc", cc)
    }

    /// Returns the `Bcc` header.
    #[must_use]
    pub fn bcc(&self) -> Option<&[EmailAddress]> {
        self.address_list("Bcc")
    }

    /// Replaces the `Bcc` header.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or an address is invalid.
    pub fn set_bcc(&mut self, bcc: Vec<EmailAddress>) -> Result<usize, ValidationError> {
        self.set_header_single_address_array("Bcc", bcc)
    }

    /// Merges addresses into the `Bcc` header.
    ///
    /// # Errors
    ///
    /// Returns an error if an address is invalid, or if the list is empty
    /// and the header is absent.
    pub fn add_bcc(&mut self, bcc: Vec<EmailAddress>) -> Result<usize, ValidationError> {
        self.add_to_address_list("Bcc", bcc)
    }

    /// Returns the `Reply-To` header.
    #[must_use]
    pub fn reply_to(&self) -> Option<&[EmailAddress]> {
        self.address_list("Reply-To")
    }

    /// Replaces the `Reply-To` header.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or an address is invalid.
    pub fn set_reply_to(&mut self, reply_to: Vec<EmailAddress>) -> Result<usize, ValidationError> {
        self.set_header_single_address_array("Reply-To", reply_to)
    }

    /// Merges addresses into the `Reply-To` header.
    ///
    /// # Errors
    ///
    /// Returns an error if an address is invalid, or if the list is empty
    /// and the header is absent.
    pub fn add_reply_to(&mut self, reply_to: Vec<EmailAddress>) -> Result<usize, ValidationError> {
        self.add_to_address_list("Reply-To", reply_to)
    }

    /// Returns the `References` header.
    #[must_use]
    pub fn references(&self) -> Option<&[String]> {
        self.string_list("References")
    }

    /// Sets the `References` header.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty.
    pub fn set_references(&mut self, references: Vec<String>) -> Result<usize, ValidationError> {
        self.set_header_string_list("References", references)
    }

    // ------------------------------------------------------------------
    // Bodies
    // ------------------------------------------------------------------

    /// Returns the plain text body.
    #[must_use]
    pub const fn body_text(&self) -> Option<&TextBody> {
        self.body_text.as_ref()
    }

    /// Returns the HTML body.
    #[must_use]
    pub const fn body_html(&self) -> Option<&HtmlBody> {
        self.body_html.as_ref()
    }

    /// Returns the structured data body.
    #[must_use]
    pub const fn body_data(&self) -> Option<&DataBody> {
        self.body_data.as_ref()
    }

    /// Returns the next auto-assigned content-id.
    pub fn next_content_id(&mut self) -> String {
        self.content_ids.next_content_id()
    }

    pub(crate) fn skip_registered_content_ids(&mut self) {
        self.content_ids.skip_registered();
    }

    /// Fills the plain text slot.
    ///
    /// A body without a content-id gets the next counter value. The
    /// content-id of the replaced body is released.
    ///
    /// # Errors
    ///
    /// Returns the body's validation error, or
    /// [`ValidationError::DuplicateContentId`] if another slot uses the id.
    pub fn set_body_text(&mut self, mut body: TextBody) -> Result<(), ValidationError> {
        admit(&body)?;
        if body.content_id().is_empty() {
            body.assign_content_id(self.content_ids.next_content_id());
        }
        let previous = self.body_text.as_ref().map(BodyPart::content_id);
        claim(&mut self.content_ids, &body, previous)?;
        self.body_text = Some(body);
        Ok(())
    }

    /// Fills the HTML slot.
    ///
    /// # Errors
    ///
    /// Returns the body's validation error, or
    /// [`ValidationError::DuplicateContentId`] if another slot uses the id.
    pub fn set_body_html(&mut self, mut body: HtmlBody) -> Result<(), ValidationError> {
        admit(&body)?;
        if body.content_id().is_empty() {
            body.assign_content_id(self.content_ids.next_content_id());
        }
        let previous = self.body_html.as_ref().map(BodyPart::content_id);
        claim(&mut self.content_ids, &body, previous)?;
        self.body_html = Some(body);
        Ok(())
    }

    /// Fills the structured data slot.
    ///
    /// # Errors
    ///
    /// Returns the body's validation error, or
    /// [`ValidationError::DuplicateContentId`] if another slot uses the id.
    pub fn set_body_data(&mut self, mut body: DataBody) -> Result<(), ValidationError> {
        admit(&body)?;
        if body.content_id().is_empty() {
            body.assign_content_id(self.content_ids.next_content_id());
        }
        let previous = self.body_data.as_ref().map(BodyPart::content_id);
        claim(&mut self.content_ids, &body, previous)?;
        self.body_data = Some(body);
        Ok(())
    }

    /// Fills the slot matching the body variant.
    ///
    /// # Errors
    ///
    /// See [`Message::set_body_text`].
    pub fn set_body(&mut self, body: MessageBody) -> Result<(), ValidationError> {
        match body {
            MessageBody::Text(text) => self.set_body_text(text),
            MessageBody::Html(html) => self.set_body_html(html),
            MessageBody::Data(data) => self.set_body_data(data),
        }
    }

    /// Fills the plain text slot from a string.
    ///
    /// # Errors
    ///
    /// See [`Message::set_body_text`].
    pub fn set_plain_text(&mut self, text: &str) -> Result<(), ValidationError> {
        self.set_body_text(TextBody::from_text(text))
    }

    /// Fills the HTML slot from a string.
    ///
    /// # Errors
    ///
    /// See [`Message::set_body_html`].
    pub fn set_html_text(&mut self, html: &str) -> Result<(), ValidationError> {
        self.set_body_html(HtmlBody::from_text(html))
    }

    /// Iterates the filled body slots in text, HTML, data order.
    pub fn bodies(&self) -> impl Iterator<Item = &dyn BodyPart> {
        let text = self.body_text.as_ref().map(|body| body as &dyn BodyPart);
        let html = self.body_html.as_ref().map(|body| body as &dyn BodyPart);
        let data = self.body_data.as_ref().map(|body| body as &dyn BodyPart);
        text.into_iter().chain(html).chain(data)
    }

    // ------------------------------------------------------------------
    // Attachments
    // ------------------------------------------------------------------

    /// Returns the attachments in order.
    #[must_use]
    pub fn attachments(&self) -> &[MessageAttachment] {
        &self.attachments
    }

    /// Replaces every attachment.
    pub fn set_attachments(&mut self, attachments: Vec<MessageAttachment>) {
        self.attachments = attachments;
    }

    /// Appends an attachment.
    pub fn add_attachment(&mut self, attachment: MessageAttachment) {
        self.attachments.push(attachment);
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Validates the uuid and, leniently, the headers.
    ///
    /// Outbound callers additionally run
    /// [`Message::validate_headers`] with [`HeaderValidation::Strict`].
    ///
    /// # Errors
    ///
    /// Returns the first violation.
    pub fn validate(&self, patterns: &dyn IdentifierPatterns) -> Result<(), ValidationError> {
        self.validate_uuid(patterns)?;
        self.validate_headers(HeaderValidation::Lenient)
    }

    // ------------------------------------------------------------------
    // Folder state
    // ------------------------------------------------------------------

    /// Returns the state kept for `folder`.
    #[must_use]
    pub fn folder_state(&self, folder: &str) -> Option<&FolderState> {
        self.folder_state.get(folder)
    }

    /// Adds `folder` with the given attributes, keeping any existing state.
    pub fn add_folder(
        &mut self,
        folder: impl Into<String>,
        attributes: Option<MessageAttributes>,
    ) -> &FolderState {
        self.folder_state
            .entry(folder.into())
            .or_insert_with(|| FolderState::new(attributes.unwrap_or_default()))
    }

    /// Makes `folder` the only folder this message is in.
    pub fn set_folder(
        &mut self,
        folder: impl Into<String>,
        attributes: Option<MessageAttributes>,
    ) -> &FolderState {
        self.folder_state.clear();
        self.add_folder(folder, attributes)
    }

    /// Iterates the folders holding state for this message.
    pub fn folders(&self) -> impl Iterator<Item = &str> {
        self.folder_state.keys().map(String::as_str)
    }
}

fn check_uuid(uuid: &str, patterns: &dyn IdentifierPatterns) -> Result<(), ValidationError> {
    if patterns.matches(PatternKind::Uuid, uuid) {
        return Ok(());
    }
    Err(ValidationError::invalid_field(
        "uuid",
        uuid,
        format!("a string matching '{}'", patterns.pattern(PatternKind::Uuid)),
    ))
}

fn require_shape(name: &str, expected: HeaderShape) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::invalid_header(
            name,
            "name must be a non-empty string",
        ));
    }
    if HeaderShape::classify(name) != expected {
        return Err(ValidationError::WrongHeaderShape {
            name: name.to_owned(),
            expected,
        });
    }
    Ok(())
}

fn admit(body: &dyn BodyPart) -> Result<(), ValidationError> {
    body.validate_structure().inspect_err(|err| {
        debug!(mime_type = body.mime_type(), error = %err, "rejected body");
    })
}

fn claim(
    registry: &mut ContentIdRegistry,
    body: &dyn BodyPart,
    previous: Option<&str>,
) -> Result<(), ValidationError> {
    registry
        .claim(body.content_id(), previous)
        .inspect_err(|err| {
            debug!(content_id = body.content_id(), error = %err, "content-id collision");
        })
}

/// Builds a [`Message`] through its validating setters.
///
/// # Examples
///
/// ```
/// use missive::message::domain::{Header, HeaderValue, Message, TextBody};
///
/// let message = Message::builder()
///     .with_header(Header::new("Subject", HeaderValue::Text("Hi".to_owned())))
///     .with_body_text(TextBody::from_text("Hello"))
///     .build()
///     .expect("valid message");
/// assert_eq!(message.subject(), Some("Hi"));
/// assert_eq!(message.body_text().map(|body| body.content()), Some(Some(&b"Hello"[..])));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    headers: Vec<Header>,
    body_text: Option<TextBody>,
    body_html: Option<HtmlBody>,
    body_data: Option<DataBody>,
    attachments: Vec<MessageAttachment>,
}

impl MessageBuilder {
    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, header: Header) -> Self {
        self.headers.push(header);
        self
    }

    /// Appends several headers.
    #[must_use]
    pub fn with_headers(mut self, headers: impl IntoIterator<Item = Header>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Sets the plain text body.
    #[must_use]
    pub fn with_body_text(mut self, body: TextBody) -> Self {
        self.body_text = Some(body);
        self
    }

    /// Sets the HTML body.
    #[must_use]
    pub fn with_body_html(mut self, body: HtmlBody) -> Self {
        self.body_html = Some(body);
        self
    }

    /// Sets the structured data body.
    #[must_use]
    pub fn with_body_data(mut self, body: DataBody) -> Self {
        self.body_data = Some(body);
        self
    }

    /// Appends an attachment.
    #[must_use]
    pub fn with_attachment(mut self, attachment: MessageAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Builds the message.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a setter.
    pub fn build(self) -> Result<Message, ValidationError> {
        let mut message = Message::new();
        message.set_headers(self.headers)?;
        if let Some(body) = self.body_text {
            message.set_body_text(body)?;
        }
        if let Some(body) = self.body_html {
            message.set_body_html(body)?;
        }
        if let Some(body) = self.body_data {
            message.set_body_data(body)?;
        }
        message.set_attachments(self.attachments);
        Ok(message)
    }
}
