use super::*;

const DOC: &str = r#"{
  "monitors": [{"id": "m1", "name": "Main", "width": 2560, "height": 1440, "backgroundImage": ""}],
  "animes": [{
    "id": "a1", "name": "Cat", "monitorId": "m1",
    "x": 100, "y": 200, "width": 120, "height": 130,
    "states": [
      {"id": "s1", "name": "idle", "spritePath": "/uploads/sprites/cat.gif", "chats": [], "gifDisposal": "AQID"},
      {"id": "s2", "name": "run", "spritePath": "", "chats": ["go"], "x": 500, "height": 90, "gifDisposal": [2, 3]}
    ]
  }],
  "language": "en",
  "darkMode": false
}"#;

#[test]
fn parses_camel_case_document() {
    let s = Settings::from_json_slice(DOC.as_bytes()).unwrap();
    assert_eq!(s.monitors[0].width, 2560);
    assert_eq!(s.animes[0].monitor_id, "m1");
    assert_eq!(s.animes[0].states[0].sprite_path, "/uploads/sprites/cat.gif");
    assert_eq!(s.language, "en");
    assert!(!s.dark_mode);
}

#[test]
fn gif_disposal_accepts_base64_and_integer_arrays() {
    let s = Settings::from_json_slice(DOC.as_bytes()).unwrap();
    assert_eq!(s.animes[0].states[0].gif_disposal, vec![1, 2, 3]);
    assert_eq!(s.animes[0].states[1].gif_disposal, vec![2, 3]);
}

#[test]
fn gif_disposal_round_trips_as_base64() {
    let s = Settings::from_json_slice(DOC.as_bytes()).unwrap();
    let json = serde_json::to_string(&s).unwrap();
    assert!(json.contains(r#""gifDisposal":"AQID""#));
    assert_eq!(Settings::from_json_slice(json.as_bytes()).unwrap(), s);
}

#[test]
fn state_rect_falls_back_per_field() {
    let s = Settings::from_json_slice(DOC.as_bytes()).unwrap();
    let anime = &s.animes[0];
    assert_eq!(
        anime.states[0].effective_rect(anime),
        PerMilleRect::new(100, 200, 120, 130)
    );
    assert_eq!(
        anime.states[1].effective_rect(anime),
        PerMilleRect::new(500, 200, 120, 90)
    );
}

#[test]
fn missing_sections_take_defaults() {
    let s = Settings::from_json_slice(br#"{"monitors": [], "animes": []}"#).unwrap();
    let d = Settings::default();
    assert_eq!(s.monitors, d.monitors);
    assert_eq!(s.animes, d.animes);
    assert_eq!(s.language, "ko");
    assert!(s.dark_mode);
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = Settings::from_json_slice(b"{\"monitors\": 3").unwrap_err();
    assert!(err.is_config());
}

#[test]
fn monitor_lookup_by_id_or_first() {
    let s = Settings::from_json_slice(DOC.as_bytes()).unwrap();
    assert_eq!(s.monitor(None).unwrap().id, "m1");
    assert_eq!(s.monitor(Some("m1")).unwrap().height, 1440);
    assert!(s.monitor(Some("nope")).unwrap_err().is_config());
}

#[test]
fn missing_fields_and_null_lists_read_as_zero_values() {
    let doc = br#"{
      "monitors": [{"name": "Side"}, {"id": "m2", "width": 800, "height": 600}],
      "animes": [
        {"monitorId": "m2", "states": null},
        {"id": "b", "x": 10, "states": [{"spritePath": "/uploads/b.gif", "chats": null}]}
      ],
      "language": "en"
    }"#;
    let s = Settings::from_json_slice(doc).unwrap();

    assert_eq!(s.monitors[0].id, "");
    assert_eq!((s.monitors[0].width, s.monitors[0].height), (0, 0));
    assert_eq!(s.monitors[1].width, 800);
    assert_eq!(s.animes[0].id, "");
    assert!(s.animes[0].states.is_empty());
    assert_eq!(s.animes[1].monitor_id, "");
    assert_eq!(s.animes[1].states[0].id, "");
    assert!(s.animes[1].states[0].chats.is_empty());
}

#[test]
fn null_top_level_lists_take_defaults() {
    let s = Settings::from_json_slice(br#"{"monitors": null, "animes": null}"#).unwrap();
    assert_eq!(s.monitors, Settings::default().monitors);
    assert_eq!(s.animes, Settings::default().animes);
}
