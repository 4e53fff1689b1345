//! Unit tests for ws-craft.

#[cfg(test)]
mod helpers {
    use ws_core::{AgentId, ItemId, StationId, Vec3};

    use crate::{ItemCatalog, Station, Task, TaskOutcome, Worker, Workshop};

    pub const RESOURCE: StationId = StationId(0);
    pub const TOY: StationId = StationId(1);
    pub const FINISH: StationId = StationId(2);

    /// `a` raw, `b = [a]`, `c = [a, a]`.
    pub fn catalog() -> (ItemCatalog, ItemId, ItemId, ItemId) {
        let mut cat = ItemCatalog::new();
        let a = cat.add("a", false, vec![]).unwrap();
        let b = cat.add("b", true, vec![a]).unwrap();
        let c = cat.add("c", true, vec![a, a]).unwrap();
        (cat, a, b, c)
    }

    /// Resource of `a` at x = -5, toy at the origin, finish at x = +5.
    pub fn workshop(requested: &[&str]) -> (Workshop, ItemId, ItemId, ItemId) {
        let (cat, a, b, c) = catalog();
        let requested = requested.iter().map(|n| cat.find(n).unwrap()).collect();
        let stations = vec![
            Station::resource(RESOURCE, Vec3::ground(-5.0, 0.0), a),
            Station::toy(TOY, Vec3::ZERO),
            Station::finish(FINISH, Vec3::ground(5.0, 0.0)),
        ];
        (Workshop::new(cat, stations, requested).unwrap(), a, b, c)
    }

    pub fn worker(id: u32, x: f32, z: f32) -> Worker {
        Worker { id: AgentId(id), position: Vec3::ground(x, z), carrying: None }
    }

    /// Take, initialize, start and complete the best task for `w`, updating
    /// what it carries.  Returns the completed task.
    pub fn run_task(ws: &mut Workshop, w: &mut Worker) -> Option<(Task, TaskOutcome)> {
        let mut task = ws.try_take_task(w)?;
        ws.initialize_task(&mut task, w);
        ws.start_task(&task);
        let outcome = ws.complete_task(&task, 0.0);
        match outcome {
            TaskOutcome::Carry(item) => w.carrying = Some(item),
            TaskOutcome::Drop => w.carrying = None,
            TaskOutcome::Nothing => {}
        }
        Some((task, outcome))
    }

    pub fn toy(ws: &Workshop) -> &crate::ToyStation {
        ws.station(TOY).and_then(|s| s.toy_state()).unwrap()
    }
}

#[cfg(test)]
mod catalog {
    use crate::{CraftError, ItemCatalog};

    use super::helpers::catalog;

    #[test]
    fn add_rejects_unknown_and_duplicate() {
        let (mut cat, a, ..) = catalog();
        assert!(matches!(cat.add("a", false, vec![]), Err(CraftError::DuplicateItem(_))));
        assert!(cat.add("x", true, vec![ws_core::ItemId(99)]).is_err());
        assert!(cat.is_ingredient_of(a, cat.find("b").unwrap()));
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let mut cat = ItemCatalog::new();
        let x = cat.add("x", true, vec![]).unwrap();
        cat.set_ingredients(x, vec![x]).unwrap();
        match cat.validate() {
            Err(CraftError::RecipeCycle(path)) => assert_eq!(path, vec!["x", "x"]),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn indirect_cycle_names_the_loop() {
        let mut cat = ItemCatalog::new();
        let raw = cat.add("raw", false, vec![]).unwrap();
        let p = cat.add("p", true, vec![raw]).unwrap();
        let q = cat.add("q", true, vec![p]).unwrap();
        cat.set_ingredients(p, vec![raw, q]).unwrap();
        let err = cat.validate().unwrap_err();
        assert_eq!(err.to_string(), "recipe cycle: p -> q -> p");
    }

    #[test]
    fn expansion_counts_shared_ingredients_per_use() {
        let (cat, a, b, c) = catalog();
        let mut out = cat.expand(&[b, c]);
        out.sort();
        assert_eq!(out, vec![a, a, a, b, c]);
    }
}

#[cfg(test)]
mod taskmaster {
    use ws_core::{ItemId, Vec3};

    use super::helpers::{FINISH, RESOURCE, TOY, catalog, run_task, toy, worker, workshop};
    use crate::{Station, TaskKind, Taskmaster, Workshop, WorkshopEvent};

    #[test]
    fn closure_is_reachable_set_including_roots() {
        let (cat, a, _, c) = catalog();
        let tm = Taskmaster::new(&cat, vec![c]).unwrap();
        let mut closure = tm.closure().to_vec();
        closure.sort();
        assert_eq!(closure, vec![a, c]);
        assert_eq!(tm.items_to_craft(c), 1);
        assert_eq!(tm.items_to_craft(a), 2);
    }

    #[test]
    fn unknown_requested_item_is_rejected() {
        let (cat, ..) = catalog();
        assert!(Taskmaster::new(&cat, vec![ItemId(42)]).is_err());
    }

    #[test]
    fn can_build_requires_craftable_outstanding_demand() {
        let (mut ws, a, b, c) = workshop(&["c"]);
        assert!(ws.can_build_item(c));
        assert!(!ws.can_build_item(a), "raw items are never built");
        assert!(!ws.can_build_item(b), "b is not demanded");

        assert!(ws.begin_building_item(c, TOY));
        assert!(!ws.can_build_item(c), "the only unit is already under way");
        assert!(!ws.begin_building_item(c, TOY));
    }

    #[test]
    fn crafting_tree_is_announced_once() {
        let (mut ws, _, b, c) = workshop(&["c", "b"]);
        let first: Vec<_> = ws.drain_events().collect();
        assert_eq!(first, vec![WorkshopEvent::CraftingTreeReady { requested: vec![c, b] }]);

        ws.begin_building_item(c, TOY);
        assert!(!ws.drain_events().any(|e| matches!(e, WorkshopEvent::CraftingTreeReady { .. })));
    }

    #[test]
    fn begin_building_queues_one_gather_per_ingredient_unit() {
        let (mut ws, a, _, c) = workshop(&["c"]);
        ws.drain_events().for_each(drop);
        assert!(ws.begin_building_item(c, TOY));

        let gathers = ws
            .taskmaster
            .tasks()
            .iter()
            .filter(|t| t.kind == TaskKind::gather(a))
            .count();
        assert_eq!(gathers, 2);
        assert_eq!(toy(&ws).pending, Some(c));

        let events: Vec<_> = ws.drain_events().collect();
        assert!(events.contains(&WorkshopEvent::BuildStarted { item: c, station: TOY }));
        assert!(events.contains(&WorkshopEvent::BuildableSetChanged));
    }

    #[test]
    fn two_unit_recipe_needs_both_before_use() {
        let (mut ws, a, _, c) = workshop(&["c"]);
        ws.begin_building_item(c, TOY);
        let mut w = worker(0, 0.0, 0.0);

        // gather, deliver
        run_task(&mut ws, &mut w).unwrap();
        run_task(&mut ws, &mut w).unwrap();
        assert_eq!(toy(&ws).inputs, vec![a]);
        assert!(!ws.taskmaster.tasks().iter().any(|t| t.kind == TaskKind::Use));

        run_task(&mut ws, &mut w).unwrap();
        run_task(&mut ws, &mut w).unwrap();
        assert_eq!(toy(&ws).inputs, vec![a, a]);
        assert!(ws.taskmaster.tasks().iter().any(|t| t.kind == TaskKind::Use));
    }

    #[test]
    fn gather_deliver_use_chain() {
        let (mut ws, a, b, _) = workshop(&["b"]);
        assert!(ws.begin_building_item(b, TOY));
        let mut w = worker(0, -1.0, 0.0);

        let (gather, _) = run_task(&mut ws, &mut w).unwrap();
        assert_eq!(gather.station, Some(RESOURCE));
        assert_eq!(gather.kind, TaskKind::Gather { item: a, destination: Some(TOY) });
        assert_eq!(w.carrying, Some(a));
        let deliver = &ws.taskmaster.tasks()[0];
        assert_eq!(deliver.kind, TaskKind::Deliver { item: a });
        assert_eq!(deliver.station, Some(TOY));

        run_task(&mut ws, &mut w).unwrap();
        assert_eq!(w.carrying, None);
        assert_eq!(toy(&ws).inputs, vec![a]);
        assert!(toy(&ws).in_transit.is_empty());
        assert_eq!(ws.taskmaster.tasks()[0].kind, TaskKind::Use);

        let (use_task, _) = run_task(&mut ws, &mut w).unwrap();
        assert_eq!(use_task.kind, TaskKind::Use);
        assert_eq!(toy(&ws).output, Some(b));
        assert!(toy(&ws).inputs.is_empty());
        assert!(!ws.station(TOY).unwrap().occupied);

        // b is a requested root: it gets routed to the finish station.
        let (to_finish, _) = run_task(&mut ws, &mut w).unwrap();
        assert_eq!(to_finish.kind, TaskKind::Gather { item: b, destination: Some(FINISH) });
        assert!(ws.taskmaster.demand.requested.is_empty());
        run_task(&mut ws, &mut w).unwrap();

        let events: Vec<_> = ws.drain_events().collect();
        assert!(events.contains(&WorkshopEvent::ItemBuilt { item: b, station: TOY }));
        assert!(events.contains(&WorkshopEvent::ItemLaunched { item: b, station: FINISH }));
        assert!(ws.taskmaster.tasks().is_empty());
    }

    #[test]
    fn single_task_goes_to_exactly_one_worker() {
        let (mut ws, _, b, _) = workshop(&["b"]);
        ws.begin_building_item(b, TOY);
        let first = worker(0, -4.0, 0.0);
        let second = worker(1, -4.5, 0.0);

        let task = ws.try_take_task(&first).expect("first worker gets the gather");
        assert_eq!(task.assignee, Some(first.id));
        assert!(ws.try_take_task(&second).is_none());
        assert!(ws.taskmaster.tasks().is_empty());
    }

    #[test]
    fn deliver_requires_matching_carried_item() {
        let (mut ws, a, b, _) = workshop(&["b"]);
        ws.taskmaster.add_task(TaskKind::Deliver { item: b }, Some(TOY));
        let mut w = worker(0, 0.0, 0.0);
        w.carrying = Some(a);
        let ctx = ws.context();
        assert!(!ws.taskmaster.tasks()[0].can_take(&w, &ctx));
        w.carrying = Some(b);
        assert!(ws.taskmaster.tasks()[0].can_take(&w, &ctx));
    }

    #[test]
    fn loaded_worker_cannot_gather() {
        let (mut ws, a, b, _) = workshop(&["b"]);
        ws.begin_building_item(b, TOY);
        let mut w = worker(0, 0.0, 0.0);
        w.carrying = Some(a);
        assert!(ws.try_take_task(&w).is_none());
    }

    #[test]
    fn gather_without_destination_is_not_takeable() {
        let (mut ws, a, ..) = workshop(&[]);
        ws.taskmaster.add_task(TaskKind::gather(a), None);
        assert!(ws.try_take_task(&worker(0, 0.0, 0.0)).is_none());
        assert_eq!(ws.taskmaster.tasks().len(), 1);
    }

    #[test]
    fn nearest_task_wins() {
        let (mut cat, a, ..) = catalog();
        let z = cat.add("z", false, vec![]).unwrap();
        let stations = vec![
            Station::resource(RESOURCE, Vec3::ground(-5.0, 0.0), a),
            Station::resource(ws_core::StationId(1), Vec3::ground(2.0, 0.0), z),
            Station::finish(ws_core::StationId(2), Vec3::ground(0.0, 40.0)),
        ];
        let mut ws = Workshop::new(cat, stations, vec![a, z]).unwrap();
        ws.taskmaster.add_task(TaskKind::gather(a), None);
        ws.taskmaster.add_task(TaskKind::gather(z), None);
        let task = ws.try_take_task(&worker(0, 0.0, 0.0)).unwrap();
        assert_eq!(task.kind.item(), Some(z));
    }

    #[test]
    fn equal_distance_tie_goes_to_higher_priority() {
        let (mut cat, a, ..) = catalog();
        let z = cat.add("z", true, vec![]).unwrap();
        let stations = vec![
            Station::resource(RESOURCE, Vec3::ground(-5.0, 0.0), a),
            Station::toy(TOY, Vec3::ground(5.0, 0.0)),
            Station::finish(FINISH, Vec3::ground(0.0, 50.0)),
        ];
        let mut ws = Workshop::new(cat, stations, vec![z, a]).unwrap();

        // Gather first in the pool so the use task has to win on priority.
        ws.taskmaster.add_task(TaskKind::gather(a), None);
        assert!(ws.begin_building_item(z, TOY), "no ingredients: use is queued at once");

        let task = ws.try_take_task(&worker(0, 0.0, 0.0)).unwrap();
        assert_eq!(task.kind, TaskKind::Use);
    }
}

#[cfg(test)]
mod stations {
    use ws_core::{StationId, Vec3};

    use super::helpers::catalog;
    use crate::{Demand, Received, Station};

    #[test]
    fn toy_reservations_never_exceed_recipe() {
        let (cat, a, b, c) = catalog();
        let demand = Demand::default();
        let mut demand_mut = Demand::default();
        let id = StationId(0);
        let mut toy = Station::toy(id, Vec3::ZERO);

        assert!(!toy.can_receive_item(a, None, &cat, &demand), "nothing pending");
        toy.accept_user_item(c);

        assert!(toy.can_receive_item(a, None, &cat, &demand));
        assert!(!toy.can_receive_item(b, None, &cat, &demand), "not an ingredient");
        toy.prepare_to_receive_item(a, &mut demand_mut);
        assert!(toy.can_receive_item(a, None, &cat, &demand));
        toy.prepare_to_receive_item(a, &mut demand_mut);
        assert!(!toy.can_receive_item(a, None, &cat, &demand), "both units reserved");

        assert_eq!(toy.receive_item(a, &cat, 0.0), Received::Stored { ready_to_use: false });
        assert!(!toy.can_receive_item(a, None, &cat, &demand));
        assert_eq!(toy.receive_item(a, &cat, 0.0), Received::Stored { ready_to_use: true });
        assert!(toy.toy_state().unwrap().remaining(&cat).is_empty());
    }

    #[test]
    fn occupied_toy_refuses_and_cannot_be_reused() {
        let (cat, a, b, _) = catalog();
        let demand = Demand::default();
        let mut toy = Station::toy(StationId(0), Vec3::ZERO);
        toy.accept_user_item(b);
        toy.receive_item(a, &cat, 0.0);
        assert!(toy.can_use(&cat));

        toy.begin_use();
        assert!(toy.occupied);
        assert!(!toy.can_use(&cat));
        assert!(!toy.can_accept_user_item(b, &cat));

        assert_eq!(toy.end_use(), Some(b));
        assert!(!toy.occupied);
        assert_eq!(toy.output_item(), Some(b));
        assert!(!toy.can_receive_item(a, None, &cat, &demand));
    }

    #[test]
    fn held_output_gates_next_build() {
        let mut cat = crate::ItemCatalog::new();
        let a = cat.add("a", false, vec![]).unwrap();
        let b = cat.add("b", true, vec![a]).unwrap();
        let big = cat.add("big", true, vec![b, a]).unwrap();
        let other = cat.add("other", true, vec![a]).unwrap();

        let id = StationId(3);
        let mut toy = Station::toy(id, Vec3::ZERO);
        toy.accept_user_item(b);
        toy.receive_item(a, &cat, 0.0);
        toy.begin_use();
        toy.end_use();

        assert!(!toy.can_accept_user_item(other, &cat), "output b is not used by `other`");
        assert!(toy.can_accept_user_item(big, &cat));
        toy.accept_user_item(big);

        let demand = Demand::default();
        assert!(toy.can_receive_item(b, Some(id), &cat, &demand), "own output may come back");
        assert!(!toy.can_receive_item(a, None, &cat, &demand), "blocked while output is held");
    }

    #[test]
    fn output_reservation_blocks_second_taker() {
        let (cat, a, b, _) = catalog();
        let mut toy = Station::toy(StationId(0), Vec3::ZERO);
        toy.accept_user_item(b);
        toy.receive_item(a, &cat, 0.0);
        toy.begin_use();
        toy.end_use();

        assert!(toy.can_take_item());
        toy.prepare_to_take_item();
        assert!(!toy.can_take_item());
        assert_eq!(toy.take_item(), Some(b));
        assert_eq!(toy.output_item(), None);
    }

    #[test]
    fn resource_is_an_infinite_source() {
        let (cat, a, ..) = catalog();
        let mut r = Station::resource(StationId(0), Vec3::ZERO, a);
        for _ in 0..3 {
            assert!(r.can_take_item());
            assert_eq!(r.take_item(), Some(a));
        }
        assert!(!r.can_receive_item(a, None, &cat, &Demand::default()));
        assert!(!r.can_use(&cat));
        assert_eq!(r.receive_item(a, &cat, 0.0), Received::Refused);
    }

    #[test]
    fn finish_accepts_only_outstanding_requests() {
        let (cat, a, b, _) = catalog();
        let mut demand = Demand { requested: vec![b], conveyor: vec![] };
        let mut f = Station::finish(StationId(0), Vec3::ZERO);
        assert!(f.can_receive_item(b, None, &cat, &demand));
        assert!(!f.can_receive_item(a, None, &cat, &demand));
        f.prepare_to_receive_item(b, &mut demand);
        assert!(demand.requested.is_empty());
        assert!(!f.can_receive_item(b, None, &cat, &demand));
        assert_eq!(f.using_animation(), None);
        assert_eq!(Station::toy(StationId(1), Vec3::ZERO).using_animation(), Some("Hammering"));
    }
}

#[cfg(test)]
mod launch {
    use ws_core::{ItemId, StationId, Vec3};

    use super::helpers::catalog;
    use crate::{LaunchPad, LaunchPadParams, LaunchPhase, Station, StationKind};

    #[test]
    fn pad_runs_through_all_phases() {
        let p = LaunchPadParams::default();
        let mut pad = LaunchPad::launch(ItemId(0), 0.0);
        let dt = 0.05;
        let mut phases = vec![pad.phase];
        let mut min_height = 0.0f32;
        let mut t = 0.0;
        let mut despawned = false;
        for _ in 0..400 {
            t += dt;
            despawned = pad.update(t, dt, &p);
            min_height = min_height.min(pad.height);
            if phases.last() != Some(&pad.phase) {
                phases.push(pad.phase);
            }
            if despawned {
                break;
            }
        }
        assert!(despawned);
        assert_eq!(
            phases,
            vec![LaunchPhase::Preparing, LaunchPhase::Launching, LaunchPhase::Coasting, LaunchPhase::Despawned]
        );
        assert!(min_height < 0.0, "pad should dip while preparing");
        assert!(t >= p.prepare_duration + p.time_to_despawn);
    }

    #[test]
    fn finish_station_replaces_pad_after_delay() {
        let (cat, _, b, _) = catalog();
        let mut f = Station::finish(StationId(0), Vec3::ZERO);
        f.receive_item(b, &cat, 10.0);
        let StationKind::Finish(state) = &mut f.kind else { unreachable!() };
        assert!(!state.idle_pad);
        assert_eq!(state.pads.len(), 1);

        state.update(11.0, 0.1);
        assert!(!state.idle_pad);
        state.update(12.0, 0.1);
        assert!(state.idle_pad);
    }
}

#[cfg(test)]
mod conveyor {
    use ws_core::{StationId, Vec3};

    use super::helpers::{catalog, run_task, worker};
    use crate::{Station, Workshop, WorkshopEvent};

    #[test]
    fn conveyor_reports_completion_when_list_empties() {
        let (cat, a, ..) = catalog();
        let stations = vec![
            Station::resource(StationId(0), Vec3::ground(-3.0, 0.0), a),
            Station::conveyor(StationId(1), Vec3::ground(3.0, 0.0)),
        ];
        let mut ws = Workshop::new(cat, stations, vec![]).unwrap().with_conveyor(vec![a, a], 0.0);
        assert_eq!(ws.taskmaster.tasks().len(), 2);

        let mut w = worker(0, 0.0, 0.0);
        for _ in 0..4 {
            run_task(&mut ws, &mut w).unwrap();
        }
        let events: Vec<_> = ws.drain_events().collect();
        let completions = events
            .iter()
            .filter(|e| matches!(e, WorkshopEvent::ConveyorComplete { .. }))
            .count();
        assert_eq!(completions, 1);
        assert!(ws.taskmaster.demand.conveyor.is_empty());
    }
}

#[cfg(test)]
mod conservation {
    use super::helpers::{TOY, run_task, worker, workshop};
    use crate::WorkshopEvent;

    #[test]
    fn every_gathered_unit_is_accounted_for() {
        let (mut ws, _, _, c) = workshop(&["c"]);
        ws.begin_building_item(c, TOY);
        let mut w = worker(0, 0.0, 0.0);

        let mut taken = 0;
        let mut received = 0;
        while run_task(&mut ws, &mut w).is_some() {
            for e in ws.drain_events() {
                match e {
                    WorkshopEvent::ItemTaken { .. } => taken += 1,
                    WorkshopEvent::ItemReceived { .. } => received += 1,
                    _ => {}
                }
            }
            let carried = usize::from(w.carrying.is_some());
            assert_eq!(taken, received + carried);
        }
        // Two `a` units into the toy, then `c` out to the finish station.
        assert_eq!(taken, 3);
        assert_eq!(received, 3);
    }
}

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::{CraftError, StationKind, load_items_reader, load_stations_reader};

    const ITEMS: &[u8] = b"\
name,craftable,ingredients\n\
block,true,wood;paint\n\
wood,false,\n\
paint,false,\n\
train,true,block;block;wood\n\
";

    const STATIONS: &[u8] = b"\
kind,x,z,radius_item,radius_use,use_dx,use_dz,output\n\
resource,-8,4,1.2,1.2,0,0,wood\n\
toy,0,0,1.5,1,0,-1.5,\n\
finish,8,0,1.5,1.5,0,0,\n\
";

    #[test]
    fn loads_items_with_forward_references() {
        let cat = load_items_reader(Cursor::new(ITEMS)).unwrap();
        assert_eq!(cat.len(), 4);
        let train = cat.find("train").unwrap();
        let block = cat.find("block").unwrap();
        let wood = cat.find("wood").unwrap();
        assert_eq!(cat.ingredients(train), &[block, block, wood]);
        assert!(!cat.is_craftable(wood));
    }

    #[test]
    fn unknown_ingredient_is_reported() {
        let csv = b"name,craftable,ingredients\nx,true,ghost\n";
        match load_items_reader(Cursor::new(&csv[..])) {
            Err(CraftError::UnknownItem(name)) => assert_eq!(name, "ghost"),
            other => panic!("expected unknown item, got {other:?}"),
        }
    }

    #[test]
    fn cyclic_csv_is_rejected() {
        let csv = b"name,craftable,ingredients\nx,true,y\ny,true,x\n";
        assert!(matches!(load_items_reader(Cursor::new(&csv[..])), Err(CraftError::RecipeCycle(_))));
    }

    #[test]
    fn loads_stations_in_file_order() {
        let cat = load_items_reader(Cursor::new(ITEMS)).unwrap();
        let stations = load_stations_reader(Cursor::new(STATIONS), &cat).unwrap();
        assert_eq!(stations.len(), 3);
        assert!(matches!(stations[0].kind, StationKind::Resource { output } if output == cat.find("wood").unwrap()));
        assert_eq!(stations[1].id.0, 1);
        assert!((stations[1].use_circle.center.z + 1.5).abs() < 1e-6);
        assert!((stations[0].item_circle.radius - 1.2).abs() < 1e-6);
        assert!(matches!(stations[2].kind, StationKind::Finish(_)));
    }

    #[test]
    fn bad_station_kind_is_a_parse_error() {
        let cat = load_items_reader(Cursor::new(ITEMS)).unwrap();
        let csv = b"kind,x,z,radius_item,radius_use,use_dx,use_dz,output\nforge,0,0,1,1,0,0,\n";
        assert!(matches!(load_stations_reader(Cursor::new(&csv[..]), &cat), Err(CraftError::Parse(_))));
    }
}
