// Potential configuration graph built from complete session descriptions

mod common;

use common::*;
use rvoip_capneg_core::{
    AttributeCapability, Capability, ConfigKind, Error, GraphConfig, MalformedConfigPolicy, MediaDescription,
    PotentialConfigGraph, SessionDescription,
};

const CRYPTO_59: &str = "10 MS_AES_256_SHA1_80 inline:HjdHIU446fe64hnu6K446rkyMjA7fQp9CnVubGVz|2^20|1:4";

#[test]
fn test_no_capabilities() {
    let graph = graph(&build(&[SESSION_HEADER, AUDIO_MEDIA, VIDEO_MEDIA]));

    assert!(graph.is_empty());
    assert!(graph.all_configs().is_empty());
    assert!(graph.all_unparsed_configs().is_empty());
    for stream in 0..2 {
        assert!(graph.all_attribute_capabilities_for(stream).is_empty());
        assert!(graph.all_transport_capabilities_for(stream).is_empty());
    }
}

#[test]
fn test_single_capability_in_session() {
    let text = build(&[
        SESSION_HEADER,
        "a=acap:1 key-mgmt:mikey AQAFgM\r\n",
        "a=tcap:1 RTP/SAVP\r\n",
        AUDIO_MEDIA,
        VIDEO_MEDIA,
    ]);
    let graph = graph(&text);

    assert_eq!(graph.global_attribute_capabilities(), &[AttributeCapability::new(1, "key-mgmt", "mikey AQAFgM")]);
    assert_eq!(graph.global_transport_capabilities(), &[Capability::transport(1, "RTP/SAVP")]);
    assert!(graph.stream_attribute_capabilities().is_empty());
    assert!(graph.stream_transport_capabilities().is_empty());

    // Session capabilities are visible from every stream
    for stream in 0..2 {
        assert_eq!(graph.all_attribute_capabilities_for(stream).len(), 1);
        assert_eq!(graph.all_transport_capabilities_for(stream).len(), 1);
    }
}

#[test]
fn test_multiple_protocols_on_same_line() {
    let text = build(&[
        SESSION_HEADER,
        "a=acap:1 key-mgmt:mikey AQAFgM\r\n",
        "a=acap:20 ptime:30\r\n",
        "a=tcap:1 RTP/SAVP RTP/SAVPF\r\n",
        "a=tcap:19 UDP/TLS/RTP/SAVPF\r\n",
        AUDIO_MEDIA,
    ]);
    let graph = graph(&text);

    assert_eq!(
        graph.global_transport_capabilities(),
        &[
            Capability::transport(1, "RTP/SAVP"),
            Capability::transport(2, "RTP/SAVPF"),
            Capability::transport(19, "UDP/TLS/RTP/SAVPF"),
        ]
    );
    assert_eq!(graph.free_transport_index(), 3);
    assert_eq!(graph.free_attribute_index(), 2);
}

#[test]
fn test_capabilities_in_media() {
    let text = build(&[
        SESSION_HEADER,
        "m=video 8078 RTP/AVP 99 97 98\r\n",
        "a=acap:1 key-mgmt:mikey AQAFgM\r\n",
        "a=acap:10021 crypto:1 AES_CM_256_HMAC_SHA1_80 inline:WVNfX19zZW1jdGwgKCkgewkyMjA7fQp9CnVubGVz|2^20|1:4\r\n",
        "a=tcap:1 RTP/SAVP\r\n",
        "a=tcap:2 RTP/SAVPF\r\n",
        "a=rtpmap:99 MP4V-ES/90000\r\n",
        "a=acap:20 ptime:30\r\n",
    ]);
    let graph = graph(&text);

    assert!(graph.global_attribute_capabilities().is_empty());
    let indices: Vec<u32> = graph.attribute_capabilities_for(0).iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![1, 10021, 20], "Declaration order is preserved");
    assert_eq!(graph.transport_capabilities_for(0).len(), 2);
    assert!(graph.attribute_capabilities_for(1).is_empty());
}

fn single_config_sdp(config_line: &str) -> String {
    build(&[
        SESSION_HEADER,
        "a=acap:1001 crypto:5 AES_CM_192_HMAC_SHA1_32 inline:CY/Dizd1QrlobZtgnigr0hWE+oDSx4S1F51Zpo4aZamN+8ZMdp8|2^20|1:4\r\n",
        "a=tcap:1 RTP/SAVP RTP/SAVPF\r\n",
        VIDEO_MEDIA,
        "a=acap:1 key-mgmt:mikey AQAFgM\r\n",
        "a=acap:20 ptime:30\r\n",
        &format!("a=acap:59 crypto:{}\r\n", CRYPTO_59),
        "a=tcap:10 UDP/TLS/RTP/SAVP\r\n",
        "a=tcap:19 UDP/TLS/RTP/SAVPF\r\n",
        config_line,
    ])
}

#[test]
fn test_config_resolution() {
    let graph = graph(&single_config_sdp("a=acfg:1475 a=20,59 t=10\r\n"));

    let configs = graph.configs_for(0);
    assert_eq!(configs.len(), 1);
    let config = &configs[&1475];
    assert_eq!(attribute_groups(&graph, config), vec![vec![(20, true), (59, true)]]);
    assert_eq!(transport_indices(&graph, config), vec![10]);
    assert!(!config.delete_media_attributes);
    assert!(!config.delete_session_attributes);

    let crypto = graph.resolve(&config.attribute_alternatives[0][1]).unwrap();
    assert_eq!(crypto.name, "crypto");
    assert_eq!(crypto.value, CRYPTO_59);
    assert!(graph.unparsed_configs_for(0).is_empty());
}

#[test]
fn test_config_with_session_capabilities() {
    let graph = graph(&single_config_sdp("a=acfg:1 a=1001,1 t=1\r\n"));

    let config = &graph.configs_for(0)[&1];
    assert_eq!(attribute_groups(&graph, config), vec![vec![(1001, true), (1, true)]]);
    assert_eq!(transport_indices(&graph, config), vec![1]);
}

#[test]
fn test_dangling_transport_reference() {
    let graph = graph(&single_config_sdp("a=acfg:1475 a=20,59 t=49\r\n"));

    assert!(graph.configs_for(0).is_empty());
    assert_eq!(graph.unparsed_configs_for(0)[&1475], "a=acfg:1475 a=20,59 t=49");
    assert!(!graph.is_empty());
}

#[test]
fn test_dangling_attribute_reference() {
    let graph = graph(&single_config_sdp("a=pcfg:1475 a=20,9 t=10\r\n"));

    assert!(graph.configs_for(0).is_empty());
    assert_eq!(graph.unparsed_configs_for(0)[&1475], "a=pcfg:1475 a=20,9 t=10");
}

#[test]
fn test_dangling_transport_alternative_is_dropped() {
    let graph = graph(&single_config_sdp("a=pcfg:1 a=1001,1 t=1|49|19\r\n"));

    let config = &graph.configs_for(0)[&1];
    assert_eq!(transport_indices(&graph, config), vec![1, 19]);
}

#[test]
fn test_optional_capabilities() {
    let graph = graph(&single_config_sdp("a=acfg:1 a=20,[1,59],1001 t=1\r\n"));
    let config = &graph.configs_for(0)[&1];
    assert_eq!(
        attribute_groups(&graph, config),
        vec![vec![(20, true), (1, false), (59, false), (1001, true)]]
    );

    let graph = common::graph(&single_config_sdp("a=acfg:1 a=20,[59] t=10\r\n"));
    let config = &graph.configs_for(0)[&1];
    assert_eq!(attribute_groups(&graph, config), vec![vec![(20, true), (59, false)]]);
}

#[test]
fn test_alternatives() {
    let graph = graph(&single_config_sdp("a=acfg:1 a=1001,1|59|20 t=1|19\r\n"));
    let config = &graph.configs_for(0)[&1];

    assert_eq!(
        attribute_groups(&graph, config),
        vec![vec![(1001, true), (1, true)], vec![(59, true)], vec![(20, true)]]
    );
    assert_eq!(transport_indices(&graph, config), vec![1, 19]);
    assert_eq!(config.combination_count(), 6);
    assert_eq!(config.combinations().len(), 6);
}

#[test]
fn test_optional_capabilities_with_alternatives() {
    let graph = graph(&single_config_sdp("a=acfg:1475 a=[20]|[59,1001] t=10\r\n"));
    let config = &graph.configs_for(0)[&1475];

    assert_eq!(
        attribute_groups(&graph, config),
        vec![vec![(20, false)], vec![(59, false), (1001, false)]]
    );
    assert_eq!(config.combination_count(), 2);
}

#[test]
fn test_delete_attributes() {
    let cases = [
        ("a=acfg:1475 a=-m:20,59 t=10\r\n", true, false),
        ("a=acfg:1475 a=-s:20,59 t=10\r\n", false, true),
        ("a=acfg:1475 a=-ms:20,59 t=10\r\n", true, true),
    ];

    for (line, media, session) in cases {
        let graph = graph(&single_config_sdp(line));
        let config = &graph.configs_for(0)[&1475];
        assert_eq!(config.delete_media_attributes, media, "{}", line);
        assert_eq!(config.delete_session_attributes, session, "{}", line);
        assert_eq!(attribute_groups(&graph, config), vec![vec![(20, true), (59, true)]]);
    }
}

#[test]
fn test_acfg_and_pcfg_on_same_stream() {
    let text = build(&[
        SESSION_HEADER,
        "a=tcap:1 RTP/SAVP\r\n",
        AUDIO_MEDIA,
        "a=acap:20 ptime:30\r\n",
        "a=pcfg:1 a=20 t=1\r\n",
        "a=acfg:2 t=1\r\n",
        "a=pcfg:3 t=1\r\n",
    ]);
    let graph = graph(&text);

    let ids: Vec<u32> = graph.configs_for(0).keys().copied().collect();
    assert_eq!(ids, vec![1, 2, 3], "Both kinds are kept");
}

#[test]
fn test_unparsed_then_parsed_same_id() {
    let text = build(&[
        SESSION_HEADER,
        "a=tcap:1 RTP/SAVP\r\n",
        AUDIO_MEDIA,
        "a=acfg:7 t=5\r\n",
        "a=pcfg:7 t=1\r\n",
        "a=pcfg:8 t=6\r\n",
    ]);
    let graph = graph(&text);

    assert_eq!(transport_indices(&graph, &graph.configs_for(0)[&7]), vec![1]);
    assert_eq!(
        graph.unparsed_configs_for(0)[&7],
        "a=acfg:7 t=5",
        "Earlier unparsed text is kept next to the resolved config"
    );
    assert_eq!(graph.unparsed_configs_for(0)[&8], "a=pcfg:8 t=6");
}

#[test]
fn test_parsed_then_unparsed_same_id() {
    let text = build(&[
        SESSION_HEADER,
        "a=tcap:1 RTP/SAVP\r\n",
        AUDIO_MEDIA,
        "a=acfg:7 t=1\r\n",
        "a=pcfg:7 t=5\r\n",
    ]);
    let graph = graph(&text);

    assert_eq!(transport_indices(&graph, &graph.configs_for(0)[&7]), vec![1], "Resolved acfg survives");
    assert_eq!(graph.unparsed_configs_for(0)[&7], "a=pcfg:7 t=5");
}

#[test]
fn test_later_config_keeps_unparsed_text() {
    let text = build(&[SESSION_HEADER, "a=tcap:1 RTP/SAVP\r\n", AUDIO_MEDIA, "a=pcfg:7 t=5\r\n"]);
    let mut graph = graph(&text);
    assert!(graph.configs_for(0).is_empty());

    graph.add_config(0, 7, &[], &[1], false, false);

    assert_eq!(transport_indices(&graph, &graph.configs_for(0)[&7]), vec![1]);
    assert_eq!(graph.unparsed_configs_for(0)[&7], "a=pcfg:7 t=5");
    assert_eq!(graph.free_config_index(0), 6);
}

#[test]
fn test_oversized_transport_groups_keep_attributes() {
    let text = build(&[
        SESSION_HEADER,
        AUDIO_MEDIA,
        "a=acap:20 ptime:30\r\n",
        "a=tcap:10 RTP/SAVP RTP/SAVPF\r\n",
        "a=pcfg:1 a=20 t=10,11\r\n",
    ]);
    let graph = graph(&text);

    let config = &graph.configs_for(0)[&1];
    assert_eq!(attribute_groups(&graph, config), vec![vec![(20, true)]]);
    assert!(config.transport_alternatives.is_empty());
    assert!(graph.unparsed_configs_for(0).is_empty());
}

#[test]
fn test_malformed_config_discards_session() {
    let text = single_config_sdp("a=acfg:1 a=20 t10\r\n");

    let mut graph = PotentialConfigGraph::new();
    match graph.process(&sdp(&text)) {
        Err(Error::MalformedConfig { stream, config, clause }) => {
            assert_eq!(stream, 0);
            assert_eq!(config, 1);
            assert_eq!(clause, "t10");
        }
        other => panic!("Expected MalformedConfig, got {:?}", other),
    }
    assert!(graph.is_empty(), "Capabilities gathered before the error are dropped");
}

#[test]
fn test_malformed_config_discards_line() {
    let text = build(&[&single_config_sdp("a=acfg:1 a=20 t10\r\n"), "a=acfg:2 a=20 t=10\r\n"]);

    let config = GraphConfig::new().with_malformed_config_policy(MalformedConfigPolicy::DiscardLine);
    let mut graph = PotentialConfigGraph::with_config(config);
    graph.process(&sdp(&text)).unwrap();

    assert_eq!(graph.unparsed_configs_for(0)[&1], "a=acfg:1 a=20 t10");
    assert!(graph.configs_for(0).contains_key(&2));
    assert_eq!(graph.attribute_capabilities_for(0).len(), 3);
}

#[test]
fn test_process_once() {
    let text = single_config_sdp("a=acfg:1475 a=20,59 t=10\r\n");
    let mut graph = PotentialConfigGraph::new();
    graph.process(&sdp(&text)).unwrap();

    assert!(matches!(graph.process(&sdp(&text)), Err(Error::AlreadyProcessed)));
    assert_eq!(graph.configs_for(0).len(), 1);
}

#[test]
fn test_duplicate_insert_is_rejected() {
    let mut graph = PotentialConfigGraph::new();
    assert!(graph.add_global_attribute_capability(1, "key-mgmt", "mikey AQAFgM"));
    assert!(!graph.add_global_attribute_capability(1, "ptime", "30"));
    assert_eq!(graph.global_attribute_capabilities().len(), 1);
    assert_eq!(graph.global_attribute_capabilities()[0].name, "key-mgmt");

    assert!(!graph.add_attribute_capability_to_stream(2, 1, "ptime", "30"));
    assert!(graph.stream_attribute_capabilities().is_empty());
}

#[test]
fn test_scope_union_order() {
    let mut graph = PotentialConfigGraph::new();
    graph.add_global_attribute_capability(5, "ptime", "20");
    graph.add_attribute_capability_to_stream(0, 7, "ptime", "30");
    graph.add_global_attribute_capability(6, "ptime", "40");
    graph.add_attribute_capability_to_stream(0, 8, "ptime", "50");

    let union: Vec<u32> = graph.all_attribute_capabilities_for(0).iter().map(|c| c.index).collect();
    let expected: Vec<u32> = graph
        .attribute_capabilities_for(0)
        .iter()
        .chain(graph.global_attribute_capabilities())
        .map(|c| c.index)
        .collect();
    assert_eq!(union, expected);
    assert_eq!(union, vec![7, 8, 5, 6]);

    let other: Vec<u32> = graph.all_attribute_capabilities_for(1).iter().map(|c| c.index).collect();
    assert_eq!(other, vec![5, 6]);
}

const COMPLEX_SDP: &str = "v=0\r\n\
    o=jehan-mac 1239 1239 IN IP6 2a01:e35:1387:1020:6233:4bff:fe0b:5663\r\n\
    s=SIP Talk\r\n\
    c=IN IP4 192.168.0.18\r\n\
    b=AS:380\r\n\
    t=0 0\r\n\
    a=ice-pwd:31ec21eb38b2ec6d36e8dc7b\r\n\
    a=acap:1001 crypto:5 AES_CM_192_HMAC_SHA1_32 inline:CY/Dizd1QrlobZtgnigr0hWE+oDSx4S1F51Zpo4aZamN+8ZMdp8|2^20|1:4\r\n\
    a=tcap:91 RTP/SAVP RTP/SAVPF\r\n\
    a=tcap:10 UDP/TLS/RTP/SAVP\r\n\
    a=acap:10021 crypto:1 AES_CM_256_HMAC_SHA1_80 inline:WVNfX19zZW1jdGwgKCkgewkyMjA7fQp9CnVubGVz|2^20|1:4\r\n\
    m=audio 7078 RTP/AVP 111 110 3 0 8 101\r\n\
    a=rtpmap:111 speex/16000\r\n\
    a=rtpmap:101 telephone-event/8000\r\n\
    a=tcap:65 RTP/AVP RTP/SAVP RTP/SAVPF\r\n\
    a=tcap:7799 RTP/AVPF\r\n\
    a=acap:8 ptime:40\r\n\
    a=acap:4 ptime:10\r\n\
    a=acap:9 ptime:20\r\n\
    a=tcap:49 UDP/TLS/RTP/SAVPF\r\n\
    a=pcfg:36825 a=-ms:[9,4] t=66|49|65\r\n\
    a=pcfg:425 a=-ms:10021|[8] t=10\r\n\
    m=video 8078 RTP/AVP 99 97 98\r\n\
    a=acap:1 key-mgmt:mikey AQAFgM\r\n\
    a=acap:97 key-mgmt:mikey RJGGgneojf\r\n\
    a=acap:59 crypto:10 MS_AES_256_SHA1_80 inline:HjdHIU446fe64hnu6K446rkyMjA7fQp9CnVubGVz|2^20|1:4\r\n\
    a=acap:20 ptime:30\r\n\
    a=tcap:1 UDP/TLS/RTP/SAVP RTP/AVP RTP/AVPF RTP/SAVP RTP/SAVPF\r\n\
    a=tcap:19 UDP/TLS/RTP/SAVPF\r\n\
    a=pcfg:1475 a=-m:[20,59]|[1001] t=10\r\n\
    a=pcfg:1 a=-m:[1001,1,59,20] t=1|19\r\n\
    a=rtpmap:99 MP4V-ES/90000\r\n\
    a=pcfg:5761 a=-m:[97],[59],1001,20 t=1|2|3|4|5\r\n\
    a=pcfg:4601 a=-m:[97,59]|10021 t=91|92\r\n\
    m=text 7078 RTP/AVP 111 110 3 0 8 101\r\n\
    a=tcap:9999 RTP/SAVP RTP/SAVPF\r\n\
    a=tcap:9799 RTP/AVP\r\n\
    a=tcap:3799 RTP/AVPF\r\n\
    a=acap:89 ptime:40\r\n\
    a=acap:44 ptime:10\r\n\
    a=acap:91 ptime:20\r\n\
    a=tcap:799 UDP/TLS/RTP/SAVP UDP/TLS/RTP/SAVPF\r\n\
    a=pcfg:999 a=-s:10021,[1001]|89 t=9999|799\r\n\
    a=pcfg:2 a=-s:1001,91 t=10000\r\n\
    a=pcfg:1000 a=-s:[44]|89|[91] t=92\r\n\
    a=fmtp:98 CIF=1;QCIF=1\r\n";

#[test]
fn test_complex_session() {
    let graph = graph(COMPLEX_SDP);

    assert_eq!(graph.global_attribute_capabilities().len(), 2);
    assert_eq!(graph.global_transport_capabilities().len(), 3);
    assert_eq!(graph.all_attribute_capabilities_for(0).len(), 5);
    assert_eq!(graph.all_transport_capabilities_for(0).len(), 8);
    assert_eq!(graph.all_attribute_capabilities_for(1).len(), 6);
    assert_eq!(graph.all_transport_capabilities_for(1).len(), 9);
    assert_eq!(graph.all_attribute_capabilities_for(2).len(), 5);
    assert_eq!(graph.all_transport_capabilities_for(2).len(), 9);
    assert!(graph.all_unparsed_configs().is_empty());

    let audio = graph.configs_for(0);
    assert_eq!(attribute_groups(&graph, &audio[&36825]), vec![vec![(9, false), (4, false)]]);
    assert_eq!(transport_indices(&graph, &audio[&36825]), vec![66, 49, 65]);
    assert!(audio[&36825].delete_media_attributes && audio[&36825].delete_session_attributes);
    assert_eq!(attribute_groups(&graph, &audio[&425]), vec![vec![(10021, true)], vec![(8, false)]]);

    let video = graph.configs_for(1);
    assert_eq!(video.len(), 4);
    assert_eq!(
        attribute_groups(&graph, &video[&1]),
        vec![vec![(1001, false), (1, false), (59, false), (20, false)]]
    );
    assert_eq!(
        attribute_groups(&graph, &video[&5761]),
        vec![vec![(97, false), (59, false), (1001, true), (20, true)]]
    );
    assert_eq!(transport_indices(&graph, &video[&5761]), vec![1, 2, 3, 4, 5]);
    assert_eq!(transport_indices(&graph, &video[&4601]), vec![91, 92]);
    assert!(video.values().all(|c| c.delete_media_attributes && !c.delete_session_attributes));

    let text = graph.configs_for(2);
    assert_eq!(
        attribute_groups(&graph, &text[&999]),
        vec![vec![(10021, true), (1001, false)], vec![(89, true)]]
    );
    assert_eq!(transport_indices(&graph, &text[&2]), vec![10000]);
    assert_eq!(
        attribute_groups(&graph, &text[&1000]),
        vec![vec![(44, false)], vec![(89, true)], vec![(91, false)]]
    );

    let combinations: usize = graph
        .all_configs()
        .values()
        .flat_map(|configs| configs.values())
        .map(|config| config.combination_count())
        .sum();
    // 3 + 2 | 2 + 2 + 5 + 4 | 4 + 1 + 3
    assert_eq!(combinations, 26);

    assert_eq!(graph.free_transport_index(), 6);
    assert_eq!(graph.free_attribute_index(), 2);
    assert_eq!(graph.free_config_index(1), 2);
}

#[test]
fn test_written_attributes_rebuild_the_graph() {
    let original = graph(COMPLEX_SDP);

    let mut rebuilt_sdp = SessionDescription::new();
    rebuilt_sdp.attributes = original.session_attributes();
    for stream in 0..3 {
        let mut media = MediaDescription::new("audio", 7078, "RTP/AVP", vec!["0".to_string()]);
        media.attributes = original.stream_attributes(stream, ConfigKind::Potential);
        rebuilt_sdp = rebuilt_sdp.with_media(media);
    }

    // Through text as well as through the model
    let rebuilt = graph(&rebuilt_sdp.to_string());

    assert_eq!(rebuilt.global_attribute_capabilities(), original.global_attribute_capabilities());
    assert_eq!(rebuilt.global_transport_capabilities(), original.global_transport_capabilities());
    assert_eq!(rebuilt.stream_attribute_capabilities(), original.stream_attribute_capabilities());
    assert_eq!(rebuilt.stream_transport_capabilities(), original.stream_transport_capabilities());
    assert_eq!(rebuilt.all_configs(), original.all_configs());

    assert_eq!(
        original.config_value(1, 5761).as_deref(),
        Some("a=-m:[97,59],1001,20 t=1|2|3|4|5")
    );
}

#[test]
fn test_answer_construction() {
    let mut graph = graph(&single_config_sdp("a=pcfg:1 a=1001,1|59|20 t=1|19\r\n"));

    // Accept the second attribute alternative over the first transport
    let id = graph.free_config_index(0);
    assert_eq!(id, 2);
    graph.add_attribute_list_to_config(0, id, &[59]);
    graph.add_transport_list_to_config(0, id, &[1]);

    let answer = &graph.configs_for(0)[&id];
    assert_eq!(attribute_groups(&graph, answer), vec![vec![(59, true)]]);
    assert_eq!(transport_indices(&graph, answer), vec![1]);
    assert!(!answer.transport_alternatives[0].mandatory);

    let lines: Vec<String> = graph
        .stream_attributes(0, ConfigKind::Actual)
        .iter()
        .filter(|a| a.name == "acfg")
        .map(|a| a.to_string())
        .collect();
    assert_eq!(lines, vec!["a=acfg:1 a=1001,1|59|20 t=1|19", "a=acfg:2 a=59 t=1"]);

    // New capabilities get an unused index
    let acap = graph.free_attribute_index();
    assert!(graph.add_attribute_capability_to_stream(0, acap, "ptime", "20"));
    let tcap = graph.free_transport_index();
    assert!(graph.add_global_transport_capability(tcap, "RTP/AVPF"));
    assert!(!graph.add_transport_capability_to_stream(0, tcap, "RTP/AVPF"));
}

#[test]
fn test_diagnostics_dump() {
    let graph = graph(&single_config_sdp("a=acfg:1475 a=20,59 t=49\r\n"));
    let json: serde_json::Value = serde_json::from_str(&graph.to_json().unwrap()).unwrap();

    assert_eq!(json["global_transport_caps"][1]["value"], "RTP/SAVPF");
    assert_eq!(json["stream_attr_caps"]["0"][2]["index"], 59);
    assert_eq!(json["unparsed_configs"]["0"]["1475"], "a=acfg:1475 a=20,59 t=49");
}
