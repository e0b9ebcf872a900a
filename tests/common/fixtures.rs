//! Static raw-event corpora used across harnesses.
//!
//! Each corpus is a `&'static [&'static str]` of JSON lines shaped like the
//! payloads the host framework publishes.

/// Controller request events: status present, runtimes in milliseconds.
pub const CORPUS_REQUESTS: &[&str] = &[
    r#"{"method":"GET","format":"*/*","params":{"controller":"users","action":"index"},"status":200,"db_runtime":12.0,"view_runtime":30.5,"time":1700000000.0,"duration":48.2}"#,
    r#"{"method":"GET","format":"json","params":{"controller":"users","action":"show","id":"42"},"status":200,"db_runtime":1.25,"view_runtime":0,"time":1700000001.0,"duration":5.1}"#,
    r#"{"method":"POST","format":"html","params":{"controller":"orders","action":"create"},"status":302,"db_runtime":8.0,"view_runtime":null,"time":1700000002.0,"duration":20.0}"#,
    r#"{"method":"DELETE","format":"json","params":{"controller":"sessions","action":"destroy"},"status":204,"time":1700000003.0,"duration":2.0}"#,
];

/// Events without a status: exceptions and the status-less authorization case.
pub const CORPUS_FAILURES: &[&str] = &[
    r#"{"method":"GET","format":"json","params":{"id":"999"},"exception":["ActiveRecord::RecordNotFound","Couldn't find User"],"db_runtime":0.4,"time":1700000004.0}"#,
    r#"{"method":"POST","format":"json","exception":["ActionController::ParameterMissing","param is missing"],"time":1700000005.0}"#,
    r#"{"method":"GET","format":"*/*","exception":["NoMethodError","undefined method"],"time":1700000006.0}"#,
    r#"{"method":"GET","format":"*/*","view_runtime":3.0,"time":1700000007.0}"#,
];

/// Query events: only `sql` and timing.
pub const CORPUS_QUERIES: &[&str] = &[
    r#"{"sql":"SELECT \"users\".* FROM \"users\" WHERE \"users\".\"id\" = $1","time":1700000008.0,"duration":0.8}"#,
    r#"{"sql":"BEGIN","time":1700000009.0,"duration":0.1}"#,
];
