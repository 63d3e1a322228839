use wasm_bindgen_test::*;
use whatif_web::platform::{KeyValueStore, PersistedSession, SessionSnapshot, Theme};
use whatif_web::storage::LocalStorageStore;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn local_storage_roundtrips_session() {
    let session = PersistedSession::with_key(LocalStorageStore, "whatif.test.session");
    let snapshot = SessionSnapshot {
        theme: Theme::Light,
        ..SessionSnapshot::default()
    };
    session.save(&snapshot).expect("save");
    assert_eq!(session.load(), Some(snapshot));
    session.clear().expect("clear");
    assert_eq!(
        LocalStorageStore.get("whatif.test.session").expect("get"),
        None
    );
}

#[wasm_bindgen_test]
fn replace_fragment_rewrites_location_hash() {
    whatif_web::app::routing::replace_fragment("#id=7");
    assert_eq!(whatif_web::app::routing::current_fragment(), "#id=7");
    assert_eq!(
        whatif_web::app::routing::current_route(),
        Some(whatif_web::platform::Route::Scenario(whatif_web::platform::ScenarioId(7)))
    );
}

#[wasm_bindgen_test]
fn theme_is_applied_to_body() {
    whatif_web::app::effects::apply_theme(Theme::Light);
    let body = whatif_web::dom::document().body().expect("body");
    assert_eq!(body.class_name(), "light-theme");
    whatif_web::app::effects::apply_theme(Theme::Dark);
    assert_eq!(body.class_name(), "");
}
