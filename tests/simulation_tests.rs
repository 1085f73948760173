#[cfg(test)]
mod tests {
    use oct_engine::measurement::{self, CASCADE_STEPS};
    use oct_engine::narrative::{self, NarrativeProvider};
    use oct_engine::state::HISTORY_CAPACITY;
    use oct_engine::*;

    /// Replays a fixed list of draws, cycling.
    struct Replay {
        values: Vec<f64>,
        next: usize,
    }

    impl Replay {
        fn new(values: &[f64]) -> Self {
            Self { values: values.to_vec(), next: 0 }
        }
    }

    impl RandomSource for Replay {
        fn uniform(&mut self) -> f64 {
            let v = self.values[self.next % self.values.len()];
            self.next += 1;
            v
        }
    }

    fn assert_bounds(state: &SimulationState) {
        for cell in state.matrix().cells() {
            assert!((0.0..=1.0).contains(cell), "cell {} out of range", cell);
        }
        for edge in state.graph().edges() {
            assert!(
                (MIN_EDGE_WEIGHT..=MAX_EDGE_WEIGHT).contains(&edge.weight),
                "weight {} out of range",
                edge.weight
            );
        }
        for node in state.graph().nodes() {
            assert!((0.0..=1.0).contains(&node.activation));
            assert!((0.0..=state.graph().bounds().width).contains(&node.x));
            assert!((0.0..=state.graph().bounds().height).contains(&node.y));
        }
        assert!((0.0..=1.0).contains(&state.integration_estimate()));
        assert!(state.dpci_history().len() <= HISTORY_CAPACITY);
        assert!(state.integration_history().len() <= HISTORY_CAPACITY);
    }

    // ========== Long Runs ==========

    #[test]
    fn test_default_testbed_holds_bounds_for_1000_ticks() {
        let mut bed = Testbed::with_seed(2026).unwrap();
        for _ in 0..1000 {
            let result = bed.tick_core();
            assert!(result.substrate.metrics.dpci_score >= 0.0);
            assert!(result.analogue.metrics.dpci_score >= 0.0);
            for variant in Variant::ALL {
                assert_bounds(bed.system(variant));
            }
        }
        assert_eq!(bed.current_tick(), 1000);
    }

    #[test]
    fn test_bounds_survive_every_perturbation() {
        let mut bed = Testbed::with_seed(77).unwrap();
        for round in 0..120 {
            let p = Perturbation::ALL[round % Perturbation::ALL.len()];
            let variant = Variant::ALL[round % 2];
            bed.perturb(variant, p);
            for v in Variant::ALL {
                assert_bounds(bed.system(v));
            }
            bed.tick_core();
        }
    }

    #[test]
    fn test_history_keeps_latest_300_in_order() {
        let mut bed = Testbed::with_seed(5).unwrap();
        let mut seen = Vec::new();
        for _ in 0..350 {
            seen.push(bed.tick_core().substrate.integration_estimate);
        }
        let history = bed.system(Variant::Substrate).integration_history();
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.to_vec(), seen[50..].to_vec());
        assert_eq!(history.latest(), seen.last().copied());
    }

    #[test]
    fn test_same_seed_bit_identical_runs() {
        let mut a = Testbed::with_seed(31).unwrap();
        let mut b = Testbed::with_seed(31).unwrap();
        for _ in 0..200 {
            let ra = a.tick_core();
            let rb = b.tick_core();
            assert_eq!(
                ra.substrate.integration_estimate.to_bits(),
                rb.substrate.integration_estimate.to_bits()
            );
            assert_eq!(ra.analogue.metrics.dpci_score.to_bits(), rb.analogue.metrics.dpci_score.to_bits());
        }
        for variant in Variant::ALL {
            assert_eq!(a.system(variant).graph(), b.system(variant).graph());
            assert_eq!(a.system(variant).matrix(), b.system(variant).matrix());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let a = Testbed::with_seed(1).unwrap();
        let b = Testbed::with_seed(2).unwrap();
        assert_ne!(a.system(Variant::Substrate).matrix(), b.system(Variant::Substrate).matrix());
    }

    // ========== Reset ==========

    #[test]
    fn test_reset_refreshes_state_and_keeps_config() {
        let mut bed = Testbed::with_seed(14).unwrap();
        bed.set_volatility(Variant::Substrate, 0.07).unwrap();
        bed.run_ticks(40);
        let graph = bed.system(Variant::Substrate).graph().clone();
        let matrix = bed.system(Variant::Substrate).matrix().clone();

        bed.perturb(Variant::Substrate, Perturbation::Reset);

        let state = bed.system(Variant::Substrate);
        assert_ne!(state.graph(), &graph);
        assert_ne!(state.matrix(), &matrix);
        assert_eq!(state.matrix_size(), 24);
        assert_eq!(state.node_count(), 35);
        assert!(state.dpci_history().is_empty());
        assert!(state.integration_history().is_empty());
        assert_eq!(state.integration_estimate(), 0.0);
        assert_eq!(state.config().volatility, 0.07);
        // The other system keeps its history.
        assert_eq!(bed.system(Variant::Analogue).dpci_history().len(), 40);
    }

    // ========== Degenerate Shapes ==========

    #[test]
    fn test_empty_network_single_cell_matrix() {
        let mut config = TestbedConfig::default();
        for entry in [&mut config.substrate, &mut config.analogue] {
            entry.node_count = 0;
            entry.matrix_size = 1;
        }
        let mut bed = Testbed::from_config(&config, Bounds::default(), 3).unwrap();
        for _ in 0..25 {
            let result = bed.tick_core();
            for snap in [result.substrate, result.analogue] {
                assert_eq!(snap.metrics.dpci_score, 0.0);
                assert_eq!(snap.metrics.network_activity.avg_activation, 0.0);
                assert_eq!(snap.metrics.network_activity.avg_weight, 0.0);
                assert_eq!(snap.metrics.dispersion_score, 0.0);
                assert_eq!(snap.integration_estimate, 0.0);
            }
        }
        bed.perturb(Variant::Analogue, Perturbation::Bombardment);
        bed.perturb(Variant::Analogue, Perturbation::Poisoning);
        assert!(bed.system(Variant::Analogue).graph().nodes().is_empty());
    }

    #[test]
    fn test_zero_matrix_size_is_rejected() {
        let mut config = TestbedConfig::default();
        config.analogue.matrix_size = 0;
        assert!(matches!(
            Testbed::from_config(&config, Bounds::default(), 1),
            Err(ValidationError::Config(ConfigError::ZeroMatrixSize))
        ));
    }

    #[test]
    fn test_four_isolated_nodes_closed_form_dpci() {
        let nodes = (0..4).map(|i| Node::at(i, 10.0, 10.0, 0.0)).collect();
        let graph = NetworkGraph::from_parts(nodes, vec![], Bounds::default()).unwrap();
        let matrix = InteractionMatrix::filled(4, 0.0).unwrap();
        let state =
            SimulationState::from_parts(Variant::Substrate, graph, matrix, DynamicsConfig::substrate()).unwrap();

        let metrics = measurement::measure(&state, &mut Replay::new(&[0.1]));
        assert_eq!(metrics.dispersion_score, 0.0);

        let sigma0 = measurement::std_dev(&[0.8, 0.0, 0.0, 0.0]);
        let expected = 2.0
            * (0..CASCADE_STEPS).map(|k| 0.9_f64.powi(k as i32) * sigma0).sum::<f64>()
            / CASCADE_STEPS as f64;
        assert!((metrics.dpci_score - expected).abs() < 1e-12);
    }

    // ========== Perturbations ==========

    #[test]
    fn test_poisoning_three_edges_respects_hit_counts() {
        let nodes = (0..3).map(|i| Node::at(i, 0.0, 0.0, 0.5)).collect();
        let edges = vec![
            Edge { source: 0, target: 1, weight: 0.9 },
            Edge { source: 1, target: 2, weight: 0.3 },
            Edge { source: 2, target: 0, weight: 0.02 },
        ];
        let graph = NetworkGraph::from_parts(nodes, edges.clone(), Bounds::default()).unwrap();
        let matrix = InteractionMatrix::filled(2, 0.5).unwrap();
        let mut state =
            SimulationState::from_parts(Variant::Analogue, graph, matrix, DynamicsConfig::analogue()).unwrap();

        // Edge 1 twice, edge 0 never.
        Perturbation::Poisoning.apply(&mut state, &mut Replay::new(&[0.5, 0.4, 0.9]));

        let weights: Vec<f64> = state.graph().edges().iter().map(|e| e.weight).collect();
        assert_eq!(weights[0], 0.9);
        assert!((weights[1] - 0.003_f64.max(MIN_EDGE_WEIGHT)).abs() < 1e-12);
        assert_eq!(weights[2], MIN_EDGE_WEIGHT);
    }

    #[test]
    fn test_bombardment_is_visible_to_next_measurement() {
        let mut bed = Testbed::with_seed(19).unwrap();
        bed.run_ticks(10);
        let before = bed.system(Variant::Substrate).metrics().network_activity.avg_activation;
        for _ in 0..4 {
            bed.perturb(Variant::Substrate, Perturbation::Bombardment);
        }
        let saturated = bed
            .system(Variant::Substrate)
            .graph()
            .nodes()
            .iter()
            .filter(|n| n.activation == 1.0)
            .count();
        assert!(saturated >= 5);
        let after = bed.tick_core().substrate.metrics.network_activity.avg_activation;
        assert!(after > before);
    }

    // ========== Export / Import ==========

    #[test]
    fn test_export_import_between_testbeds() {
        let mut source = Testbed::with_seed(40).unwrap();
        source.set_volatility(Variant::Analogue, 0.011).unwrap();
        source.reconfigure(12, 8).unwrap();
        source.run_ticks(30);
        let json = source.export_json().unwrap();

        let mut target = Testbed::with_seed(41).unwrap();
        target.run_ticks(5);
        target.import_json(&json).unwrap();

        assert_eq!(target.export_config(), source.export_config());
        assert_eq!(target.current_tick(), 0);
        assert_eq!(target.system(Variant::Analogue).node_count(), 12);
        assert_eq!(target.system(Variant::Substrate).matrix_size(), 8);
        assert_eq!(target.system(Variant::Analogue).config().volatility, 0.011);
    }

    #[test]
    fn test_rejected_payloads_leave_testbed_untouched() {
        let mut bed = Testbed::with_seed(8).unwrap();
        bed.run_ticks(12);
        let snapshot = bed.export_json().unwrap();
        let matrix = bed.system(Variant::Analogue).matrix().clone();

        let mut extra: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
        extra["substrate"]["colour"] = serde_json::json!("blue");
        let mut swapped: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
        swapped["substrate"]["variant"] = serde_json::json!("Analogue");
        let mut negative: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
        negative["analogue"]["config"]["node_speed"] = serde_json::json!(-0.5);

        let payloads = [
            snapshot[..snapshot.len() / 2].to_string(),
            extra.to_string(),
            swapped.to_string(),
            negative.to_string(),
            "null".to_string(),
        ];
        for payload in &payloads {
            assert!(bed.import_json(payload).is_err(), "accepted {}", payload);
        }

        assert_eq!(bed.current_tick(), 12);
        assert_eq!(bed.system(Variant::Analogue).matrix(), &matrix);
        assert_eq!(bed.export_json().unwrap(), snapshot);
    }

    // ========== Indicators & Narrative ==========

    #[test]
    fn test_indicators_track_substrate() {
        let mut bed = Testbed::with_seed(23).unwrap();
        let mut peak: f64 = 0.0;
        for _ in 0..60 {
            let result = bed.tick_core();
            peak = peak.max(result.substrate.integration_estimate);
            let ind = result.indicators;
            assert!((ind.self_quality - result.substrate.integration_estimate * 100.0).abs() < 1e-9);
            assert_eq!(ind.self_quality_lamp, Some(LampStatus::classify(ind.self_quality)));
        }
        assert_eq!(bed.indicators().peak_integration, peak);
    }

    struct Offline;

    impl NarrativeProvider for Offline {
        fn name(&self) -> &str {
            "offline"
        }

        fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
            Err(ProviderError::Unavailable("no network".to_string()))
        }
    }

    #[test]
    fn test_narrative_falls_back_when_provider_fails() {
        let mut bed = Testbed::with_seed(6).unwrap();
        bed.run_ticks(20);
        let input = bed.narrative_input();
        let story = narrative::narrate(Some(&Offline), &input);
        assert_eq!(story.source, NarrativeSource::Local);
        assert_eq!(story.text, narrative::local_narrative(&input));
        assert!(narrative::build_prompt(&input).contains("dPCI"));
    }
}
