//! `create_dossier` -- install the dossier with its participant.

use pensum_core::properties::invalid_date;
use pensum_core::{
    code, CalculationMessage, Dossier, MutationEnvelope, Person, PersonRole, Properties, Situation,
};

use crate::context::EvalContext;
use crate::EvalError;

pub(crate) fn apply(
    envelope: &MutationEnvelope,
    situation: &mut Situation,
    ctx: &EvalContext<'_>,
) -> Result<Vec<CalculationMessage>, EvalError> {
    let props = Properties::new(&envelope.properties);

    if situation.dossier.is_some() {
        return Ok(vec![CalculationMessage::critical(
            code::DOSSIER_ALREADY_EXISTS,
            "the situation already contains a dossier",
        )]);
    }

    let name = props.string("name");
    if name.trim().is_empty() {
        return Ok(vec![CalculationMessage::critical(
            code::INVALID_NAME,
            "person name must not be empty",
        )]);
    }

    let birth_date = props.date("birth_date");
    if birth_date == invalid_date() || birth_date > ctx.today {
        return Ok(vec![CalculationMessage::critical(
            code::INVALID_BIRTH_DATE,
            "birth date must be a valid calendar date no later than today",
        )]);
    }

    let participant = Person {
        person_id: props.string("person_id"),
        role: PersonRole::Participant,
        name,
        birth_date,
    };
    situation.dossier = Some(Dossier::new(props.string("dossier_id"), participant));

    Ok(Vec::new())
}
