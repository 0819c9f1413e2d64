use samlsig_core::Error;
use samlsig_dsig::{verify, verify_saml_signature, DsigContext};
use samlsig_keys::{loader, Key};
use samlsig_xml::Document;

fn fixture_text(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(path).unwrap()
}

fn fixture(name: &str) -> Document {
    Document::parse(&fixture_text(name)).unwrap()
}

fn public_key(name: &str) -> Key {
    let path = format!("{}/tests/fixtures/{name}.spki", env!("CARGO_MANIFEST_DIR"));
    loader::load_key_file(std::path::Path::new(&path)).unwrap()
}

fn verify_fixture(saml: &str, key: &str) -> Result<bool, Error> {
    verify_saml_signature(&fixture(saml), &public_key(key))
}

#[test]
fn test_auth_request_signed_with_rsa() {
    assert!(verify_fixture("auth_r_signed.xml", "rsa").unwrap());
    assert!(!verify_fixture("auth_r_signed.xml", "rsa2").unwrap());
}

#[test]
fn test_auth_request_signed_with_rsa2() {
    assert!(verify_fixture("auth_r_signed2.xml", "rsa2").unwrap());
    assert!(!verify_fixture("auth_r_signed2.xml", "rsa").unwrap());
}

#[test]
fn test_with_comments_variant() {
    assert!(verify_fixture("auth_r_with_comments_signed.xml", "rsa").unwrap());
}

#[test]
fn test_with_comments_variant_covers_the_comment() {
    let text = fixture_text("auth_r_with_comments_signed.xml")
        .replace("requested by the staff portal", "requested by somebody else");
    let doc = Document::parse(&text).unwrap();
    assert!(!verify_saml_signature(&doc, &public_key("rsa")).unwrap());
}

#[test]
fn test_prefix_list_variant() {
    assert!(verify_fixture("auth_r_prefix_list_signed.xml", "rsa").unwrap());
}

#[test]
fn test_response_with_wrapped_signature_value() {
    assert!(verify_fixture("response_signed.xml", "rsa").unwrap());
}

#[test]
fn test_broken_digest() {
    assert!(!verify_fixture("response_signed_broken.xml", "rsa").unwrap());
}

#[test]
fn test_broken_signature_value() {
    assert!(!verify_fixture("response_signed_broken2.xml", "rsa").unwrap());
}

#[test]
fn test_unsigned_message() {
    assert!(matches!(
        verify_fixture("response_unsigned.xml", "rsa"),
        Err(Error::UnsignedMessage)
    ));
    let key = loader::load_pkcs8_pem(include_bytes!("fixtures/rsa.pkcs8")).unwrap();
    assert!(matches!(
        verify_saml_signature(&fixture("response_unsigned.xml"), &key),
        Err(Error::UnsignedMessage)
    ));
}

#[test]
fn test_assertion_and_message_signed() {
    assert!(verify_fixture("response_assertion_and_message_signed.xml", "rsa").unwrap());
    assert!(!verify_fixture("response_assertion_and_message_signed.xml", "rsa2").unwrap());
}

/// Replace the text of the `n`th element called `local_name` in the dsig namespace.
fn corrupt(doc: &mut Document, local_name: &str, n: usize, value: &str) {
    let mut found = Vec::new();
    collect(doc, doc.root(), local_name, &mut found);
    doc.set_text(found[n], value).unwrap();
}

fn collect(doc: &Document, node: samlsig_xml::NodeId, local_name: &str, out: &mut Vec<samlsig_xml::NodeId>) {
    if doc.is_element_named(node, "http://www.w3.org/2000/09/xmldsig#", local_name) {
        out.push(node);
    }
    for child in doc.children(node) {
        collect(doc, *child, local_name, out);
    }
}

// The root signature comes first in document order, the assertion's second.
const ROOT: usize = 0;
const ASSERTION: usize = 1;

#[test]
fn test_dual_signature_requires_both() {
    let key = public_key("rsa");
    let name = "response_assertion_and_message_signed.xml";

    let mut doc = fixture(name);
    corrupt(&mut doc, "DigestValue", ASSERTION, "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=");
    assert!(!verify_saml_signature(&doc, &key).unwrap());

    let mut doc = fixture(name);
    corrupt(&mut doc, "DigestValue", ROOT, "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=");
    assert!(!verify_saml_signature(&doc, &key).unwrap());

    // A syntactically valid signature made by the other key.
    let other = fixture("auth_r_signed2.xml");
    let mut values = Vec::new();
    collect(&other, other.root(), "SignatureValue", &mut values);
    let foreign = other.text(values[0]);

    let mut doc = fixture(name);
    corrupt(&mut doc, "SignatureValue", ROOT, &foreign);
    assert!(!verify_saml_signature(&doc, &key).unwrap());

    let mut doc = fixture(name);
    corrupt(&mut doc, "SignatureValue", ASSERTION, &foreign);
    assert!(!verify_saml_signature(&doc, &key).unwrap());
}

#[test]
fn test_verification_is_idempotent() {
    let doc = fixture("response_assertion_and_message_signed.xml");
    let before = doc.to_xml();
    let ctx = DsigContext::new(public_key("rsa")).with_debug(true);
    let first = verify(&ctx, &doc).unwrap();
    let second = verify(&ctx, &doc).unwrap();
    assert!(first);
    assert_eq!(first, second);
    assert_eq!(doc.to_xml(), before);

    let broken = fixture("response_signed_broken.xml");
    assert_eq!(verify(&ctx, &broken).unwrap(), verify(&ctx, &broken).unwrap());
}

// ── Documents outside the signature profile ─────────────────────────

const SIGNED_ID: &str = "_4fd1c3aa2b8e49d1a1f0c6c0b5e77a01";

fn verify_modified(from: &str, to: &str) -> Result<bool, Error> {
    let text = fixture_text("auth_r_signed.xml");
    assert!(text.contains(from), "fixture does not contain {from}");
    let doc = Document::parse(&text.replacen(from, to, 1))?;
    verify_saml_signature(&doc, &public_key("rsa"))
}

#[test]
fn test_reference_to_another_element() {
    let err = verify_modified(&format!("URI=\"#{SIGNED_ID}\""), "URI=\"#_elsewhere\"").unwrap_err();
    match err {
        Error::Linkage { uri, id } => {
            assert_eq!(uri, "#_elsewhere");
            assert_eq!(id, SIGNED_ID);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_transform_chain_deviations() {
    let enveloped = r#"<ds:Transform Algorithm="http://www.w3.org/2000/09/xmldsig#enveloped-signature"/>"#;
    let exc = r#"<ds:Transform Algorithm="http://www.w3.org/2001/10/xml-exc-c14n#"/>"#;
    let tripled = format!("{exc}{exc}");
    for (from, to) in [
        (enveloped, ""),
        (exc, ""),
        (exc, tripled.as_str()),
        (
            exc,
            r#"<ds:Transform Algorithm="http://www.w3.org/TR/2001/REC-xml-c14n-20010315"/>"#,
        ),
        (
            enveloped,
            r#"<ds:Transform Algorithm="http://www.w3.org/2001/10/xml-exc-c14n#"/>"#,
        ),
    ] {
        assert!(
            matches!(verify_modified(from, to), Err(Error::UnsupportedTransform(_))),
            "{to} accepted"
        );
    }
}

#[test]
fn test_unsupported_algorithms() {
    for (from, to) in [
        (
            "http://www.w3.org/2000/09/xmldsig#sha1\"",
            "http://www.w3.org/2001/04/xmlenc#sha512\"",
        ),
        (
            "http://www.w3.org/2000/09/xmldsig#rsa-sha1",
            "http://www.w3.org/2000/09/xmldsig#dsa-sha1",
        ),
        (
            "<ds:CanonicalizationMethod Algorithm=\"http://www.w3.org/2001/10/xml-exc-c14n#\"/>",
            "<ds:CanonicalizationMethod Algorithm=\"http://www.w3.org/TR/2001/REC-xml-c14n-20010315\"/>",
        ),
    ] {
        assert!(
            matches!(verify_modified(from, to), Err(Error::UnsupportedAlgorithm(_))),
            "{to} accepted"
        );
    }
}

#[test]
fn test_malformed_signature_elements() {
    assert!(matches!(
        verify_modified("</ds:Reference>", "</ds:Reference><ds:Reference URI=\"#x\"/>"),
        Err(Error::XmlStructure(_))
    ));
    assert!(matches!(
        verify_modified("<ds:SignatureValue>pu22", "<ds:SignatureValue>*u22"),
        Err(Error::Base64(_))
    ));
    assert!(matches!(
        verify_modified("<ds:DigestMethod Algorithm", "<ds:DigestMethod Other"),
        Err(Error::MissingAttribute(_))
    ));
}

#[test]
fn test_signature_method_change_breaks_signature() {
    // rsa-sha256 over the same SignedInfo is a different, non-matching signature.
    assert!(!verify_modified(
        "http://www.w3.org/2000/09/xmldsig#rsa-sha1",
        "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256"
    )
    .unwrap());
}

#[test]
fn test_signed_attribute_change_is_detected() {
    assert!(!verify_modified(
        "Destination=\"https://idp.example.com/sso\"",
        "Destination=\"https://evil.example.com/sso\""
    )
    .unwrap());
}
