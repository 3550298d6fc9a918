//! Unit tests for tc-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EventId, RowId};

    #[test]
    fn index_roundtrip() {
        let id = RowId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(RowId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn next_is_strictly_greater() {
        assert!(EventId(0).next() > EventId(0));
        assert_eq!(EventId(7).next(), EventId(8));
    }

    #[test]
    fn display() {
        assert_eq!(EventId(7).to_string(), "EventId(7)");
    }
}

#[cfg(test)]
mod tick {
    use crate::{Tick, TickClock, TickCounter, TickSource};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10.0);
        assert_eq!(t + 5.0, Tick(15.0));
        assert_eq!(Tick(15.0).since(t), 5.0);
        assert_eq!(Tick(3.0).since(Tick(4.5)), -1.5);
    }

    #[test]
    fn ordering_is_total() {
        assert!(Tick(1.0) < Tick(1.5));
        assert!(Tick(-0.5) < Tick(0.0));
        assert!(!Tick(f64::NAN).is_finite());
    }

    #[test]
    fn counter_clones_share_state() {
        let counter = TickCounter::new();
        let mut writer = counter.clone();
        writer.advance(2.5);
        assert_eq!(counter.ticks(), Tick(2.5));
        assert_eq!(writer.get(), 2.5);
    }

    #[test]
    fn counter_display() {
        assert_eq!(TickCounter::starting_at(3.0).to_string(), "T3");
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_shuffle() {
        let mut a: Vec<u32> = (0..20).collect();
        let mut b = a.clone();
        SimRng::new(9).shuffle(&mut a);
        SimRng::new(9).shuffle(&mut b);
        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }
}

#[cfg(test)]
mod period {
    use crate::{PeriodUnit, TimeError};

    #[test]
    fn names_and_aliases() {
        assert_eq!("milli".parse::<PeriodUnit>().unwrap(), PeriodUnit::Milli);
        assert_eq!("Seconds".parse::<PeriodUnit>().unwrap(), PeriodUnit::Second);
        assert_eq!(" HOURS ".parse::<PeriodUnit>().unwrap(), PeriodUnit::Hour);
        assert_eq!("dom".parse::<PeriodUnit>().unwrap(), PeriodUnit::Day);
        assert_eq!("julianday".parse::<PeriodUnit>().unwrap(), PeriodUnit::DayOfYear);
        assert_eq!("wday".parse::<PeriodUnit>().unwrap(), PeriodUnit::DayOfWeek);
        assert_eq!("weeks".parse::<PeriodUnit>().unwrap(), PeriodUnit::Week);
        assert_eq!("month".parse::<PeriodUnit>().unwrap(), PeriodUnit::Month);
        assert_eq!("years".parse::<PeriodUnit>().unwrap(), PeriodUnit::Year);
    }

    #[test]
    fn unknown_name() {
        assert!(matches!(
            "fortnight".parse::<PeriodUnit>(),
            Err(TimeError::UnknownUnit(_))
        ));
    }

    #[test]
    fn fixed_widths_cascade() {
        assert_eq!(PeriodUnit::Week.fixed_millis(), Some(604_800_000.0));
        assert_eq!(PeriodUnit::DayOfYear.fixed_millis(), PeriodUnit::Day.fixed_millis());
        assert_eq!(PeriodUnit::Month.fixed_millis(), None);
        assert!(PeriodUnit::Year.is_calendar());
        assert!(!PeriodUnit::Week.is_calendar());
    }
}

#[cfg(test)]
mod pattern {
    use crate::Variant;
    use crate::pattern::{infer_variant, to_strftime};

    #[test]
    fn default_patterns_translate() {
        assert_eq!(to_strftime("yyyy-MM-dd HH:mm:ss.SSS").unwrap(), "%Y-%m-%d %H:%M:%S.%3f");
        assert_eq!(to_strftime("yyyy-MM-dd").unwrap(), "%Y-%m-%d");
        assert_eq!(to_strftime("MM-dd").unwrap(), "%m-%d");
    }

    #[test]
    fn quoted_literals_and_percent() {
        assert_eq!(to_strftime("yyyy'T'HH").unwrap(), "%YT%H");
        assert_eq!(to_strftime("dd'%'").unwrap(), "%d%%");
        assert_eq!(to_strftime("h 'o''clock'").unwrap(), "%-I o'clock");
    }

    #[test]
    fn unknown_letter_rejected() {
        assert!(to_strftime("yyyy-QQ").is_err());
        assert!(to_strftime("'open").is_err());
    }

    #[test]
    fn variant_inference() {
        assert_eq!(infer_variant("dd.MM.yyyy HH:mm"), Variant::DateTime);
        assert_eq!(infer_variant("dd.MM.yyyy"), Variant::Date);
        assert_eq!(infer_variant("dd/MM"), Variant::MonthDay);
        assert_eq!(infer_variant("MM-dd 'Hour'"), Variant::MonthDay);
    }
}

#[cfg(test)]
mod parse {
    use crate::{CalendarTime, TimeError, Variant};

    fn shown(text: &str) -> String {
        CalendarTime::parse(text).unwrap().format_default().unwrap()
    }

    #[test]
    fn full_datetime_forms() {
        assert_eq!(shown("2012-11-10T09:08:07.654"), "2012-11-10 09:08:07.654");
        assert_eq!(shown("2012/11/10 9:08:07.654"), "2012-11-10 09:08:07.654");
        assert_eq!(shown("2012-1-1 09:08:07.654"), "2012-01-01 09:08:07.654");
    }

    #[test]
    fn missing_trailing_fields_default_to_zero() {
        assert_eq!(shown("2012-11-10 09:08:07"), "2012-11-10 09:08:07.000");
        assert_eq!(shown("2012-11-10 09:08"), "2012-11-10 09:08:00.000");
        assert_eq!(shown("2012-11-10 9"), "2012-11-10 09:00:00.000");
        assert_eq!(shown("2012-11-10 09:08:07.5"), "2012-11-10 09:08:07.500");
    }

    #[test]
    fn length_picks_variant() {
        assert_eq!(CalendarTime::parse("2012-01-1").unwrap().variant(), Variant::Date);
        assert_eq!(CalendarTime::parse("1-01").unwrap().variant(), Variant::MonthDay);
        assert_eq!(CalendarTime::parse("2012-01-01 00").unwrap().variant(), Variant::DateTime);
        assert_eq!(shown("2012/1/5"), "2012-01-05");
        assert_eq!(shown("1-5"), "01-05");
        assert_eq!(shown("02-29"), "02-29");
    }

    #[test]
    fn empty_and_now_are_current_instant() {
        assert_eq!(CalendarTime::parse("").unwrap().variant(), Variant::DateTime);
        assert_eq!(CalendarTime::parse("now").unwrap().variant(), Variant::DateTime);
    }

    #[test]
    fn malformed_input_names_the_string() {
        for bad in ["2012-11-10 09:8", "2012-11-10 09:08:7", "2012-13-01", "12-2012-01", "abc", "02-30"] {
            match CalendarTime::parse(bad) {
                Err(TimeError::Parse(s)) => assert_eq!(s, bad),
                other => panic!("{bad:?} parsed as {other:?}"),
            }
        }
    }

    #[test]
    fn explicit_format_infers_variant_and_keeps_pattern() {
        let t = CalendarTime::parse_with_format("10.11.2012 09:08", "dd.MM.yyyy HH:mm").unwrap();
        assert_eq!(t.variant(), Variant::DateTime);
        assert_eq!(t.to_string(), "10.11.2012 09:08");
        assert_eq!(t.format_default().unwrap(), "2012-11-10 09:08:00.000");

        let d = CalendarTime::parse_with_format("10/11/2012", "dd/MM/yyyy").unwrap();
        assert_eq!(d.variant(), Variant::Date);
        assert_eq!(d.format_default().unwrap(), "2012-11-10");

        let md = CalendarTime::parse_with_format("10/11", "dd/MM").unwrap();
        assert_eq!(md.variant(), Variant::MonthDay);
        assert_eq!(md.format_default().unwrap(), "11-10");
    }

    #[test]
    fn explicit_format_defaults_omitted_fields() {
        let hour = CalendarTime::parse_with_format("2020-01-01 05", "yyyy-MM-dd HH").unwrap();
        assert_eq!(hour.variant(), Variant::DateTime);
        assert_eq!(hour.format_default().unwrap(), "2020-01-01 05:00:00.000");

        let twelve = CalendarTime::parse_with_format("2020-01-01 7", "yyyy-MM-dd h").unwrap();
        assert_eq!(twelve.format_default().unwrap(), "2020-01-01 07:00:00.000");

        let month = CalendarTime::parse_with_format("2020-03", "yyyy-MM").unwrap();
        assert_eq!(month.variant(), Variant::Date);
        assert_eq!(month.format_default().unwrap(), "2020-03-01");

        let year = CalendarTime::parse_with_format("2021", "yyyy").unwrap();
        assert_eq!(year.format_default().unwrap(), "2021-01-01");

        let ordinal = CalendarTime::parse_with_format("2020 061", "yyyy DDD").unwrap();
        assert_eq!(ordinal.format_default().unwrap(), "2020-03-01");
    }

    #[test]
    fn explicit_format_mismatch_is_error() {
        assert!(matches!(
            CalendarTime::parse_with_format("2012-11-10", "dd.MM.yyyy"),
            Err(TimeError::ParseWithFormat { .. })
        ));
    }
}

#[cfg(test)]
mod format {
    use crate::{CalendarTime, TimeError};

    #[test]
    fn user_pattern_and_blank_default() {
        let t = CalendarTime::parse("2012-11-10 09:08:07.654").unwrap();
        assert_eq!(t.format("yyyy").unwrap(), "2012");
        assert_eq!(t.format("dd MMM yyyy, HH'h'").unwrap(), "10 Nov 2012, 09h");
        assert_eq!(t.format("  ").unwrap(), "2012-11-10 09:08:07.654");

        let d = CalendarTime::parse("2012-11-10").unwrap();
        assert_eq!(d.format("").unwrap(), "2012-11-10");
    }

    #[test]
    fn time_fields_on_a_date_fail() {
        let d = CalendarTime::parse("2012-11-10").unwrap();
        assert!(matches!(d.format("HH:mm"), Err(TimeError::Format { .. })));
    }
}

#[cfg(test)]
mod arithmetic {
    use crate::{CalendarTime, PeriodUnit, TimeError};

    fn plus(text: &str, unit: PeriodUnit, amount: f64) -> String {
        CalendarTime::parse(text)
            .unwrap()
            .plus(unit, amount)
            .unwrap()
            .format_default()
            .unwrap()
    }

    #[test]
    fn month_clamps_to_last_valid_day() {
        assert_eq!(plus("2020-01-31", PeriodUnit::Month, 1.0), "2020-02-29");
        assert_eq!(plus("2021-01-31", PeriodUnit::Month, 1.0), "2021-02-28");
        assert_eq!(plus("2020-02-29", PeriodUnit::Year, 1.0), "2021-02-28");
    }

    #[test]
    fn month_and_thirty_days_differ() {
        assert_eq!(plus("2020-01-31", PeriodUnit::Day, 30.0), "2020-03-01");
        assert_ne!(
            plus("2020-01-31", PeriodUnit::Day, 30.0),
            plus("2020-01-31", PeriodUnit::Month, 1.0)
        );
    }

    #[test]
    fn calendar_amounts_round_half_up() {
        assert_eq!(plus("2020-01-15", PeriodUnit::Month, 1.5), "2020-03-15");
        assert_eq!(plus("2020-01-15", PeriodUnit::Month, 1.4), "2020-02-15");
        assert_eq!(plus("2020-03-15", PeriodUnit::Month, -1.0), "2020-02-15");
    }

    #[test]
    fn fixed_units_on_datetime() {
        assert_eq!(plus("2020-01-01 00:00", PeriodUnit::Hour, 1.5), "2020-01-01 01:30:00.000");
        assert_eq!(plus("2020-01-01 00:00", PeriodUnit::Week, 1.0), "2020-01-08 00:00:00.000");
        assert_eq!(plus("2020-01-01 00:00", PeriodUnit::Milli, 250.0), "2020-01-01 00:00:00.250");
    }

    #[test]
    fn date_drops_sub_day_remainder() {
        assert_eq!(plus("2020-01-01", PeriodUnit::Hour, 36.0), "2020-01-02");
        assert_eq!(plus("2020-01-01", PeriodUnit::Hour, -36.0), "2019-12-31");
        assert_eq!(plus("2020-01-01", PeriodUnit::Hour, 23.0), "2020-01-01");
    }

    #[test]
    fn fractional_weeks_land_on_whole_days() {
        // 31/7 + 34/7 weeks is 65 days, a float product just under 65 * 86_400_000 ms.
        let weeks = 31.0 / 7.0 + 34.0 / 7.0;
        assert_eq!(plus("2020-01-01", PeriodUnit::Week, weeks), "2020-03-06");
        assert_eq!(plus("2020-01-01 00:00", PeriodUnit::Week, weeks), "2020-03-06 00:00:00.000");
    }

    #[test]
    fn month_day_wraps_the_year() {
        assert_eq!(plus("12-31", PeriodUnit::Day, 1.0), "01-01");
        assert_eq!(plus("01-01", PeriodUnit::Day, -1.0), "12-31");
        assert_eq!(plus("02-28", PeriodUnit::Day, 1.0), "02-29");
        assert_eq!(plus("12-15", PeriodUnit::Month, 1.0), "01-15");
    }

    #[test]
    fn day_of_week_is_not_addable() {
        let t = CalendarTime::parse("2020-01-01").unwrap();
        assert!(matches!(
            t.plus(PeriodUnit::DayOfWeek, 1.0),
            Err(TimeError::UnsupportedUnit { .. })
        ));
    }
}

#[cfg(test)]
mod difference {
    use crate::{CalendarTime, PeriodUnit, TimeError, Variant};

    fn diff(a: &str, b: &str, unit: PeriodUnit) -> f64 {
        let a = CalendarTime::parse(a).unwrap();
        let b = CalendarTime::parse(b).unwrap();
        a.difference(unit, &b).unwrap()
    }

    #[test]
    fn fixed_units_scale_milliseconds() {
        assert_eq!(diff("2020-01-01", "2020-01-31", PeriodUnit::Day), 30.0);
        assert_eq!(diff("2020-01-01", "2020-01-31", PeriodUnit::Hour), 720.0);
        assert_eq!(diff("2020-01-31", "2020-01-01", PeriodUnit::Day), -30.0);
        assert_eq!(diff("2020-01-01 00:00", "2020-01-01 00:00:00.010", PeriodUnit::Milli), 10.0);
        assert!((diff("2020-01-01", "2020-01-15", PeriodUnit::Week) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn months_are_whole_calendar_months() {
        assert_eq!(diff("2020-01-31", "2020-02-29", PeriodUnit::Month), 1.0);
        assert_eq!(diff("2020-01-31", "2020-02-28", PeriodUnit::Month), 0.0);
        assert_eq!(diff("2020-03-15", "2020-01-20", PeriodUnit::Month), -1.0);
        assert_eq!(diff("2020-01-15 12:00", "2020-02-15 11:59", PeriodUnit::Month), 0.0);
    }

    #[test]
    fn years_are_whole_years() {
        assert_eq!(diff("2019-06-01", "2021-05-31", PeriodUnit::Year), 1.0);
        assert_eq!(diff("2019-06-01", "2021-06-01", PeriodUnit::Year), 2.0);
    }

    #[test]
    fn month_day_distances_use_leap_reference_year() {
        assert_eq!(diff("01-01", "03-01", PeriodUnit::Day), 60.0);
        assert_eq!(diff("01-31", "03-01", PeriodUnit::Month), 1.0);
    }

    #[test]
    fn month_day_year_difference_is_unsupported() {
        let a = CalendarTime::parse("01-01").unwrap();
        let b = CalendarTime::parse("06-01").unwrap();
        assert!(matches!(
            a.difference(PeriodUnit::Year, &b),
            Err(TimeError::UnsupportedUnit { unit: PeriodUnit::Year, .. })
        ));
    }

    #[test]
    fn variant_mismatch() {
        let a = CalendarTime::parse("2020-01-01 00:00").unwrap();
        let b = CalendarTime::parse("2020-01-01").unwrap();
        assert_eq!(
            a.difference(PeriodUnit::Day, &b),
            Err(TimeError::VariantMismatch { left: Variant::DateTime, right: Variant::Date })
        );
        assert!(a.is_before(&b).is_err());
    }
}

#[cfg(test)]
mod comparison {
    use std::cmp::Ordering;

    use crate::CalendarTime;

    fn t(text: &str) -> CalendarTime {
        CalendarTime::parse(text).unwrap()
    }

    #[test]
    fn before_after_equal() {
        let a = t("2020-01-01");
        let b = t("2020-01-02");
        assert!(a.is_before(&b).unwrap());
        assert!(b.is_after(&a).unwrap());
        assert!(!a.is_after(&a).unwrap());
        assert!(a.is_equal(&t("2020/1/1")).unwrap());
        assert_eq!(a.compare(&b).unwrap(), Ordering::Less);
    }

    #[test]
    fn between_is_inclusive_and_order_free() {
        let lo = t("2020-01-01");
        let hi = t("2020-01-10");
        for x in ["2020-01-01", "2020-01-05", "2020-01-10"] {
            assert!(t(x).is_between(&lo, &hi).unwrap());
            assert!(t(x).is_between(&hi, &lo).unwrap());
        }
        assert!(!t("2020-01-11").is_between(&hi, &lo).unwrap());
    }

    #[test]
    fn closer_uses_strict_comparison() {
        let here = t("2020-01-01 00:00:00.010");
        let before = t("2020-01-01 00:00:00.005");
        let after = t("2020-01-01 00:00:00.015");
        // Exact midpoint: not strictly closer to A, so the answer favours B.
        assert!(!here.is_closer_to_a_than_b(&before, &after).unwrap());
        assert!(!here.is_closer_to_a_than_b(&after, &before).unwrap());
        let nearer = t("2020-01-01 00:00:00.006");
        assert!(here.is_closer_to_a_than_b(&nearer, &before).unwrap());
    }
}

#[cfg(test)]
mod fields {
    use crate::{CalendarTime, PeriodUnit, TimeError};

    #[test]
    fn datetime_fields() {
        let t = CalendarTime::parse("2020-03-01 13:45:10.250").unwrap();
        assert_eq!(t.get(PeriodUnit::Milli).unwrap(), 250);
        assert_eq!(t.get(PeriodUnit::Second).unwrap(), 10);
        assert_eq!(t.get(PeriodUnit::Minute).unwrap(), 45);
        assert_eq!(t.get(PeriodUnit::Hour).unwrap(), 13);
        assert_eq!(t.get(PeriodUnit::Day).unwrap(), 1);
        assert_eq!(t.get(PeriodUnit::DayOfYear).unwrap(), 61);
        assert_eq!(t.get(PeriodUnit::DayOfWeek).unwrap(), 7);
        assert_eq!(t.get(PeriodUnit::Week).unwrap(), 9);
        assert_eq!(t.get(PeriodUnit::Month).unwrap(), 3);
        assert_eq!(t.get(PeriodUnit::Year).unwrap(), 2020);
    }

    #[test]
    fn unsupported_fields() {
        let d = CalendarTime::parse("2020-03-01").unwrap();
        assert!(matches!(d.get(PeriodUnit::Hour), Err(TimeError::UnsupportedField { .. })));
        let md = CalendarTime::parse("03-01").unwrap();
        assert_eq!(md.get(PeriodUnit::Month).unwrap(), 3);
        assert!(matches!(md.get(PeriodUnit::Year), Err(TimeError::UnsupportedField { .. })));
    }
}

#[cfg(test)]
mod anchor {
    use crate::{CalendarTime, PeriodUnit, TickClock, TickCounter, TimeError};

    #[test]
    fn anchored_value_follows_the_counter() {
        let counter = TickCounter::new();
        let mut t = CalendarTime::parse("2020-01-01").unwrap();
        t.set_anchor(1.0, PeriodUnit::Day, counter.clone()).unwrap();
        assert!(t.is_anchored());
        assert_eq!(t.format_default().unwrap(), "2020-01-01");

        let mut clock = counter.clone();
        clock.advance(31.0);
        assert_eq!(t.format_default().unwrap(), "2020-02-01");
        assert_eq!(t.get(PeriodUnit::Month).unwrap(), 2);
        clock.advance(1.0);
        assert_eq!(t.to_string(), "2020-02-02");
    }

    #[test]
    fn scale_multiplies_ticks() {
        let counter = TickCounter::new();
        let mut t = CalendarTime::parse("2020-01-01 00:00").unwrap();
        t.set_anchor(15.0, PeriodUnit::Minute, counter.clone()).unwrap();
        let mut clock = counter;
        clock.advance(6.0);
        assert_eq!(t.format_default().unwrap(), "2020-01-01 01:30:00.000");
    }

    #[test]
    fn snapshot_freezes_the_observed_value() {
        let counter = TickCounter::new();
        let mut t = CalendarTime::parse("2020-01-01").unwrap();
        t.set_anchor(1.0, PeriodUnit::Day, counter.clone()).unwrap();
        let mut clock = counter;
        clock.advance(2.0);
        let frozen = t.snapshot().unwrap();
        clock.advance(2.0);
        assert!(!frozen.is_anchored());
        assert_eq!(frozen.format_default().unwrap(), "2020-01-03");
        assert_eq!(t.format_default().unwrap(), "2020-01-05");
        assert!(frozen.is_before(&t).unwrap());
    }

    #[test]
    fn day_of_week_anchor_rejected() {
        let mut t = CalendarTime::parse("2020-01-01").unwrap();
        assert!(matches!(
            t.set_anchor(1.0, PeriodUnit::DayOfWeek, TickCounter::new()),
            Err(TimeError::UnsupportedUnit { .. })
        ));
        assert!(!t.is_anchored());
    }
}

#[cfg(test)]
mod properties {
    use chrono::{NaiveDate, TimeDelta};
    use proptest::prelude::*;

    use crate::CalendarTime;

    fn day(n: i64) -> CalendarTime {
        let base = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        CalendarTime::from(base + TimeDelta::days(n))
    }

    proptest! {
        #[test]
        fn between_ignores_bound_order(x in 0i64..20_000, lo in 0i64..20_000, hi in 0i64..20_000) {
            let forward = day(x).is_between(&day(lo), &day(hi)).unwrap();
            let swapped = day(x).is_between(&day(hi), &day(lo)).unwrap();
            prop_assert_eq!(forward, swapped);
        }

        #[test]
        fn default_format_round_trips(
            y in 1900i32..2100, mo in 1u32..=12, d in 1u32..=28,
            h in 0u32..24, mi in 0u32..60, s in 0u32..60, ms in 0u32..1000,
        ) {
            let text = format!("{y:04}-{mo:02}-{d:02} {h:02}:{mi:02}:{s:02}.{ms:03}");
            let parsed = CalendarTime::parse(&text).unwrap();
            prop_assert_eq!(parsed.format_default().unwrap(), text);
        }
    }
}
