//! End-to-end tests of a session against a scripted manager.
//!
//! Drives the same handlers `dsc` uses, from authentication through
//! retrieval and hint resolution to the rendered CSV.

use deepsecurity::cli::{self, Entity, ListOptions, ListQuery};
use deepsecurity::config::ConnectionConfig;
use deepsecurity::soap::ScriptedTransport;
use deepsecurity::{Manager, ReportFormat, ResultCache, SchemaRegistry, WireValue};
use std::sync::Arc;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn host(id: &str, name: &str, group: &str) -> WireValue {
    WireValue::map([
        ("id", id.into()),
        ("name", name.into()),
        ("host_group_id", group.into()),
        ("host_type", "STANDARD".into()),
        ("platform", "Microsoft Windows Server 2008 R2 (64 bit)".into()),
    ])
}

fn scripted(transport: ScriptedTransport) -> (Manager, Arc<ScriptedTransport>) {
    let transport = Arc::new(
        transport
            .reply("authenticate", "SID-42".into())
            .reply("end_session", WireValue::Nil),
    );
    let manager = Manager::new(Box::new(Arc::clone(&transport)), ResultCache::default());
    (manager, transport)
}

fn options(entity: Entity, fields: &str) -> ListOptions {
    ListOptions {
        fields: cli::parse_fields(SchemaRegistry::global(), entity.class(), fields).unwrap(),
        format: ReportFormat::Csv,
        time_format: TIME_FORMAT.to_string(),
        progress_bar: false,
    }
}

#[test]
fn host_list_follows_group_hints() {
    let (manager, transport) = scripted(
        ScriptedTransport::new()
            .reply(
                "host_retrieve_all",
                WireValue::List(vec![host("1", "web01", "7"), host("2", "db, primary", "7")]),
            )
            .reply(
                "host_group_retrieve",
                WireValue::map([("id", "7".into()), ("name", "Servers".into())]),
            ),
    );

    let csv = cli::run_session(manager, &ConnectionConfig::default(), |manager| {
        cli::run_list(
            manager,
            Entity::Host,
            &ListQuery::All,
            &options(Entity::Host, "id,name,host_type,host_group.name"),
        )
    })
    .unwrap()
    .unwrap();

    assert_eq!(
        csv,
        "id,name,host_type,host_group.name\n\
         1,web01,standard,Servers\n\
         2,\"db, primary\",standard,Servers\n"
    );
    // Both hosts share a group; the second lookup is served from the cache.
    assert_eq!(transport.call_count("host_group_retrieve"), 1);
    assert_eq!(transport.call_count("end_session"), 1);
}

#[test]
fn host_details_request_detail_level() {
    let detail = WireValue::map([
        ("id", "1".into()),
        ("name", "web01".into()),
        ("overall_last_successful_communication", "2013-05-01T12:30:00.000Z".into()),
    ]);
    let (manager, transport) =
        scripted(ScriptedTransport::new().reply("host_detail_retrieve", WireValue::List(vec![detail])));

    let csv = cli::run_session(manager, &ConnectionConfig::default(), |manager| {
        cli::run_list(
            manager,
            Entity::HostDetail,
            &ListQuery::HostDetails {
                detail_level: cli::parse_detail_level("high")?,
            },
            &options(Entity::HostDetail, "name,overall_last_successful_communication"),
        )
    })
    .unwrap()
    .unwrap();

    assert_eq!(
        csv,
        "name,overall_last_successful_communication\nweb01,2013-05-01 12:30\n"
    );
    let call = transport
        .calls()
        .into_iter()
        .find(|call| call.method == "host_detail_retrieve")
        .unwrap();
    assert_eq!(call.param("hostDetailLevel"), Some(&WireValue::text("HIGH")));
    assert_eq!(call.param("sID"), Some(&WireValue::text("SID-42")));
}

#[test]
fn failed_hint_becomes_error_cell() {
    let (manager, _) = scripted(
        ScriptedTransport::new()
            .reply("host_retrieve_all", WireValue::List(vec![host("1", "web01", "9")]))
            .fault("host_group_retrieve", "Server", "Object not found"),
    );

    let csv = cli::run_session(manager, &ConnectionConfig::default(), |manager| {
        cli::run_list(
            manager,
            Entity::Host,
            &ListQuery::All,
            &options(Entity::Host, "name,host_group.name"),
        )
    })
    .unwrap()
    .unwrap();

    let mut lines = csv.lines().skip(1);
    let row = lines.next().unwrap();
    assert!(row.starts_with("web01,"), "{row}");
    assert!(row.contains("ERROR ("), "{row}");
    assert!(row.contains("Object not found"), "{row}");
}

#[test]
fn system_events_send_time_filter() {
    let events = WireValue::map([(
        "system_events",
        WireValue::map([(
            "item",
            WireValue::map([
                ("event_id", "600".into()),
                ("event", "User Signed In".into()),
                ("time", "2013-05-01T08:00:00Z".into()),
            ]),
        )]),
    )]);
    let (manager, transport) =
        scripted(ScriptedTransport::new().reply("system_event_retrieve", events));

    let csv = cli::run_session(manager, &ConnectionConfig::default(), |manager| {
        cli::run_list(
            manager,
            Entity::SystemEvent,
            &ListQuery::SystemEvents {
                time_filter: cli::parse_time_filter("last_hour")?,
                include_non_host_events: true,
            },
            &options(Entity::SystemEvent, "time,event_id,event"),
        )
    })
    .unwrap()
    .unwrap();

    assert_eq!(csv, "time,event_id,event\n2013-05-01 08:00,600,User Signed In\n");
    let call = transport
        .calls()
        .into_iter()
        .find(|call| call.method == "system_event_retrieve")
        .unwrap();
    assert_eq!(
        call.param("timeFilter").and_then(|filter| filter.get("type")),
        Some(&WireValue::text("LAST_HOUR"))
    );
    assert_eq!(call.param("includeNonHostEvents"), Some(&WireValue::text("true")));
}

#[test]
fn json_listing_keeps_types() {
    let (manager, _) = scripted(ScriptedTransport::new().reply(
        "host_group_retrieve_all",
        WireValue::List(vec![WireValue::map([
            ("id", "3".into()),
            ("name", "Servers".into()),
            ("external", "true".into()),
        ])]),
    ));
    let mut options = options(Entity::HostGroup, "id,name,external,parent_group_id");
    options.format = ReportFormat::Json;

    let json = cli::run_session(manager, &ConnectionConfig::default(), |manager| {
        cli::run_list(manager, Entity::HostGroup, &ListQuery::All, &options)
    })
    .unwrap()
    .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!([
            {"id": 3, "name": "Servers", "external": true, "parent_group_id": null}
        ])
    );
}

#[test]
fn unknown_wire_field_fails_the_listing() {
    let (manager, transport) = scripted(ScriptedTransport::new().reply(
        "security_profile_retrieve_all",
        WireValue::List(vec![WireValue::map([
            ("id", "1".into()),
            ("brand_new_field", "x".into()),
        ])]),
    ));

    let result = cli::run_session(manager, &ConnectionConfig::default(), |manager| {
        cli::run_list(
            manager,
            Entity::SecurityProfile,
            &ListQuery::All,
            &options(Entity::SecurityProfile, "id"),
        )
    });

    let err = format!("{:#}", result.unwrap_err());
    assert!(err.contains("brand_new_field"), "{err}");
    // The session is still torn down.
    assert_eq!(transport.call_count("end_session"), 1);
}
